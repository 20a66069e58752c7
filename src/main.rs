// SPDX-License-Identifier: MPL-2.0
use glance::app::{self, Flags};

fn main() -> iced::Result {
    let mut args = pico_args::Arguments::from_env();

    let flags = Flags {
        lang: args.opt_value_from_str("--lang").unwrap_or(None),
        file_paths: args
            .finish()
            .into_iter()
            .filter_map(|s| s.into_string().ok())
            .map(Into::into)
            .collect(),
    };

    app::run(flags)
}
