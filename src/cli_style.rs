use clap::builder::styling::{AnsiColor, Color, Style};
use clap::builder::Styles;
use crossterm::style::{Attribute, Stylize};
use sumini_studio::song::ParsedSong;
use sumini_studio::ui::HelpTopic;
use unicode_width::UnicodeWidthStr;

// ═══════════════════════════════════════════════════════════════════════════════
// Clap Styles
// ═══════════════════════════════════════════════════════════════════════════════

pub fn get_styles() -> Styles {
    let header = Style::new()
        .bold()
        .underline()
        .fg_color(Some(Color::Ansi(AnsiColor::Magenta)));
    let bad = Style::new()
        .bold()
        .fg_color(Some(Color::Ansi(AnsiColor::Red)));

    Styles::styled()
        .usage(header)
        .header(header)
        .literal(
            Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Yellow))),
        )
        .invalid(bad)
        .error(bad)
        .valid(
            Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Green))),
        )
        .placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::BrightBlack))))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Color Palette - Studio Gold
// ═══════════════════════════════════════════════════════════════════════════════

pub mod colors {
    use crossterm::style::Color;

    pub const GOLD: Color = Color::Rgb {
        r: 255,
        g: 196,
        b: 0,
    };
    pub const AMBER: Color = Color::Rgb {
        r: 255,
        g: 140,
        b: 0,
    };
    pub const ROSE: Color = Color::Rgb {
        r: 255,
        g: 95,
        b: 135,
    };
    pub const GREEN: Color = Color::Rgb {
        r: 0,
        g: 230,
        b: 118,
    };
    pub const DIM: Color = Color::Rgb {
        r: 128,
        g: 128,
        b: 128,
    };
    pub const WHITE: Color = Color::Rgb {
        r: 255,
        g: 255,
        b: 255,
    };
}

pub mod box_chars {
    pub const ROUND_TOP_LEFT: &str = "╭";
    pub const ROUND_TOP_RIGHT: &str = "╮";
    pub const ROUND_BOTTOM_LEFT: &str = "╰";
    pub const ROUND_BOTTOM_RIGHT: &str = "╯";
    pub const HORIZONTAL: &str = "─";
    pub const NOTE: &str = "♪";
    pub const DIAMOND: &str = "◆";
    pub const CHECK: &str = "✓";
}

const CARD_WIDTH: usize = 60;

// ═══════════════════════════════════════════════════════════════════════════════
// Status Indicators
// ═══════════════════════════════════════════════════════════════════════════════

pub fn print_success(message: &str) {
    println!(
        " {} {}",
        box_chars::CHECK.with(colors::GREEN).bold(),
        message.with(colors::GREEN)
    );
}

pub fn print_warning(message: &str) {
    println!(
        " {} {}",
        "⚠".with(colors::AMBER).bold(),
        message.with(colors::AMBER)
    );
}

// ═══════════════════════════════════════════════════════════════════════════════
// Sections
// ═══════════════════════════════════════════════════════════════════════════════

pub fn print_section_header(title: &str) {
    let title_len = title.width();
    let padding = CARD_WIDTH.saturating_sub(title_len + 4) / 2;

    println!();
    print!("{}", box_chars::ROUND_TOP_LEFT.with(colors::GOLD));
    print!("{}", box_chars::HORIZONTAL.repeat(padding).with(colors::GOLD));
    print!(
        " {} ",
        title.with(colors::GOLD).bold().attribute(Attribute::Italic)
    );
    print!(
        "{}",
        box_chars::HORIZONTAL
            .repeat(CARD_WIDTH.saturating_sub(title_len + 4 + padding))
            .with(colors::GOLD)
    );
    println!("{}", box_chars::ROUND_TOP_RIGHT.with(colors::GOLD));
}

pub fn print_section_footer() {
    print!("{}", box_chars::ROUND_BOTTOM_LEFT.with(colors::GOLD));
    print!("{}", box_chars::HORIZONTAL.repeat(CARD_WIDTH).with(colors::GOLD));
    println!("{}", box_chars::ROUND_BOTTOM_RIGHT.with(colors::GOLD));
    println!();
}

pub fn print_key_value(key: &str, value: &str) {
    println!(
        "  {} {} {}",
        box_chars::DIAMOND.with(colors::ROSE),
        format!("{}:", key).with(colors::DIM),
        value.with(colors::WHITE)
    );
}

/// Print a block of text, dimmed, under a section header.
pub fn print_block(title: &str, body: &str) {
    print_section_header(title);
    for line in body.lines() {
        println!("  {}", line.with(colors::DIM));
    }
    print_section_footer();
}

// ═══════════════════════════════════════════════════════════════════════════════
// Song Card
// ═══════════════════════════════════════════════════════════════════════════════

pub fn print_song(song: &ParsedSong) {
    print_section_header(&format!("{} {}", box_chars::NOTE, song.title));
    print_key_value("Voice", &song.voice);
    print_key_value("Style", &song.style);
    if !song.tags.is_empty() {
        let tags: Vec<String> = song.tags.iter().map(|t| format!("#{}", t)).collect();
        println!("  {}", tags.join(" ").with(colors::AMBER));
    }
    println!();
    for line in song.lyrics.lines() {
        if is_section_tag(line) {
            println!("  {}", line.with(colors::GOLD).bold());
        } else {
            println!("  {}", line.with(colors::WHITE));
        }
    }
    if let Some(video) = &song.video_prompt {
        println!();
        print_key_value("Video", video);
    }
    print_section_footer();
}

pub fn print_help_topic(topic: &HelpTopic, right_to_left: bool) {
    print_section_header(topic.title);
    println!("  {}", topic.description.attribute(Attribute::Italic));
    println!();
    for detail in topic.details {
        if right_to_left {
            println!(
                "  {} {}",
                detail.text.with(colors::WHITE),
                format!(":{}", detail.label).with(colors::GOLD).bold()
            );
        } else {
            print_key_value(detail.label, detail.text);
        }
    }
    print_section_footer();
}

/// Bracketed lyric tags such as `[Chorus]` or `[Instrumental Intro]`.
fn is_section_tag(line: &str) -> bool {
    let line = line.trim();
    line.len() > 2 && line.starts_with('[') && line.ends_with(']')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_tags() {
        assert!(is_section_tag("[Chorus]"));
        assert!(is_section_tag("  [Instrumental Intro] "));
        assert!(!is_section_tag("[]"));
        assert!(!is_section_tag("Walking [slowly] home"));
    }
}
