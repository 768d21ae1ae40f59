use std::io::IsTerminal;

use crossterm::style::{Color, Stylize};

const BANNER_LINES: [&str; 3] = [
    "╔═╗╦═╗╔═╗╔╦╗╦╔╗╔╔═╗╔═╗╔═╗╔╦╗",
    "╠═╝╠╦╝║ ║║║║║║║║║ ╦║╣ ╚═╗ ║ ",
    "╩  ╩╚═╚═╝╩ ╩╩╝╚╝╚═╝╚═╝╚═╝ ╩ ",
];

const TITLE_RGB: (u8, u8, u8) = (0xe6, 0x52, 0x2c);
const SUBTITLE_RGB: (u8, u8, u8) = (0x3a, 0xa9, 0xff);
const OK_RGB: (u8, u8, u8) = (0x4c, 0xd9, 0x64);
/// Inner width of the boxed stage headings.
const BOX_WIDTH: usize = 36;

/// Console writer for the human-facing progress lines.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Console {
    use_color: bool,
}

impl Console {
    pub(crate) fn new(no_color: bool) -> Self {
        Self {
            use_color: !no_color && std::io::stdout().is_terminal(),
        }
    }

    pub(crate) fn banner(self) {
        for line in BANNER_LINES {
            println!("{}", self.paint(line, TITLE_RGB));
        }
        let description = format!(
            "promingest v{} | {} | prometheus ingestion",
            env!("CARGO_PKG_VERSION"),
            env!("CARGO_PKG_LICENSE")
        );
        println!("{}", self.paint(&description, SUBTITLE_RGB));
    }

    /// Prints a boxed heading announcing a stage.
    pub(crate) fn stage(self, title: &str) {
        let [top, middle, bottom] = boxed(title, '┌', '│', '└', '─', '┐', '┘');
        println!();
        println!("{}", self.paint(&top, SUBTITLE_RGB));
        println!("{}", self.paint(&middle, SUBTITLE_RGB));
        println!("{}", self.paint(&bottom, SUBTITLE_RGB));
    }

    pub(crate) fn ok(self, message: &str) {
        println!("{} {}", self.paint("✓", OK_RGB), message);
    }

    pub(crate) fn note(self, message: &str) {
        println!("{message}");
    }

    /// Final summary with the persisted sample count.
    pub(crate) fn persisted(self, count: usize) {
        let [top, middle, bottom] = boxed(
            &format!("✓ Successfully imported {} samples", count),
            '╔',
            '║',
            '╚',
            '═',
            '╗',
            '╝',
        );
        println!();
        println!("{}", self.paint(&top, OK_RGB));
        println!("{}", self.paint(&middle, OK_RGB));
        println!("{}", self.paint(&bottom, OK_RGB));
    }

    fn paint(self, text: &str, rgb: (u8, u8, u8)) -> String {
        if self.use_color {
            let (r, g, b) = rgb;
            text.with(Color::Rgb { r, g, b }).to_string()
        } else {
            text.to_owned()
        }
    }
}

fn boxed(
    title: &str,
    top_left: char,
    side: char,
    bottom_left: char,
    fill: char,
    top_right: char,
    bottom_right: char,
) -> [String; 3] {
    let width = BOX_WIDTH.max(title.chars().count().saturating_add(2));
    let rule: String = std::iter::repeat_n(fill, width).collect();
    [
        format!("{top_left}{rule}{top_right}"),
        format!("{side} {title:<inner$} {side}", inner = width.saturating_sub(2)),
        format!("{bottom_left}{rule}{bottom_right}"),
    ]
}
