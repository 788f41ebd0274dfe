//! Colour roles for terminal output
//!
//! Every coloured thing the program prints (report headings, table keys, the
//! utilisation verdict, clap help) names a logical [`StyleRole`] rather than a
//! concrete colour. Colour is applied only when the caller says it is enabled,
//! so there is no global colour state.
//!
//! ```
//! use prioqueue::core::styles::StyleRole;
//!
//! assert_eq!(StyleRole::Header.paint("Throughput", false), "Throughput");
//! let painted = StyleRole::Header.paint("Throughput", true);
//! assert!(painted.starts_with("\x1b[") && painted.ends_with("\x1b[0m"));
//! ```

use clap::builder::styling::{AnsiColor, Color as ClapColor, Style, Styles};
use colored::Color;

macro_rules! style {
    ( $( $variant:ident => $color:expr ),+ $(,)? ) => {
        #[derive(Copy, Clone, Debug, PartialEq, Eq)]
        pub enum StyleRole { $( $variant ),+ }

        impl StyleRole {
            pub fn color(self) -> Option<Color> {
                match self { $( StyleRole::$variant => $color ),+ }
            }
        }
    }
}

style! {
    Header      => Some(Color::Yellow),
    Key         => Some(Color::BrightGreen),
    Valid       => Some(Color::Green),
    Invalid     => Some(Color::Red),
    Error       => Some(Color::BrightRed),
    Literal     => Some(Color::Cyan),
    Placeholder => Some(Color::Green),
}

impl StyleRole {
    pub fn ansi_code(self) -> Option<String> {
        self.color().map(ansi_code)
    }

    /// Wrap `text` in this role's escape sequence when `enabled`
    pub fn paint(self, text: &str, enabled: bool) -> String {
        match self.ansi_code() {
            Some(code) if enabled => format!("\x1b[{}m{}\x1b[0m", code, text),
            _ => text.to_string(),
        }
    }

    /// Foreground spec for `prettytable` cells, e.g. `Fy`
    pub fn to_prettytable_spec(self) -> Option<String> {
        let spec_char = match self.color()? {
            Color::Black => 'k',
            Color::Red => 'r',
            Color::Green => 'g',
            Color::Yellow => 'y',
            Color::Blue => 'b',
            Color::Magenta => 'm',
            Color::Cyan => 'c',
            Color::White => 'w',
            Color::BrightBlack => 'K',
            Color::BrightRed => 'R',
            Color::BrightGreen => 'G',
            Color::BrightYellow => 'Y',
            Color::BrightBlue => 'B',
            Color::BrightMagenta => 'M',
            Color::BrightCyan => 'C',
            Color::BrightWhite => 'W',
            _ => return None,
        };
        Some(format!("F{}", spec_char))
    }

    fn clap_style(self, bold: bool) -> Style {
        let mut style = Style::new();
        if let Some(ansi) = self.color().and_then(to_clap_ansi) {
            style = style.fg_color(Some(ClapColor::Ansi(ansi)));
        }
        if bold {
            style = style.bold();
        }
        style
    }
}

fn ansi_code(color: Color) -> String {
    use Color::*;
    match color {
        Black => "30".to_string(),
        Red => "31".to_string(),
        Green => "32".to_string(),
        Yellow => "33".to_string(),
        Blue => "34".to_string(),
        Magenta => "35".to_string(),
        Cyan => "36".to_string(),
        White => "37".to_string(),
        BrightBlack => "90".to_string(),
        BrightRed => "91".to_string(),
        BrightGreen => "92".to_string(),
        BrightYellow => "93".to_string(),
        BrightBlue => "94".to_string(),
        BrightMagenta => "95".to_string(),
        BrightCyan => "96".to_string(),
        BrightWhite => "97".to_string(),
        TrueColor { r, g, b } => format!("38;2;{};{};{}", r, g, b),
    }
}

fn to_clap_ansi(color: Color) -> Option<AnsiColor> {
    use AnsiColor as A;
    use Color::*;
    Some(match color {
        Black => A::Black,
        Red => A::Red,
        Green => A::Green,
        Yellow => A::Yellow,
        Blue => A::Blue,
        Magenta => A::Magenta,
        Cyan => A::Cyan,
        White => A::White,
        BrightBlack => A::BrightBlack,
        BrightRed => A::BrightRed,
        BrightGreen => A::BrightGreen,
        BrightYellow => A::BrightYellow,
        BrightBlue => A::BrightBlue,
        BrightMagenta => A::BrightMagenta,
        BrightCyan => A::BrightCyan,
        BrightWhite => A::BrightWhite,
        _ => return None,
    })
}

/// clap help styles built from the same roles
pub fn palette_to_clap(enabled: bool) -> Styles {
    if !enabled {
        return Styles::plain();
    }

    Styles::styled()
        .header(StyleRole::Header.clap_style(true))
        .usage(StyleRole::Header.clap_style(true))
        .literal(StyleRole::Literal.clap_style(false))
        .placeholder(StyleRole::Placeholder.clap_style(false))
        .valid(StyleRole::Valid.clap_style(false))
        .invalid(StyleRole::Invalid.clap_style(false))
        .error(StyleRole::Error.clap_style(true))
}
