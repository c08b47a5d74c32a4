//! Markup rendering for room text.
//!
//! Formatting runs three stages in a fixed order:
//!
//! 1. [`rewrite_tags`] turns `[p:..]`, `[e:..]`, `[i:..]`, `[c:..]` and
//!    `[b:..]` spans into colour specifiers;
//! 2. [`substitute_specifiers`] replaces `<name>` specifiers with their text
//!    or ANSI sequences;
//! 3. [`gate_capabilities`] strips what the viewer's client cannot show.

use std::sync::LazyLock;

use rand::Rng;
use regex::Regex;

use super::viewer::Viewer;

/// Server name substituted for `<server_name>` when none is configured.
pub const DEFAULT_SERVER_NAME: &str = "SERVER_NAME";

/// Tag pattern and its replacement template, applied in this order.
static TAG_RULES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        // players
        (r"\[p:(.+?)\]", "<yellow>[<green>${1}<yellow>]<reset>"),
        // exits
        (r"\[e:(.+?)\]", "<yellow>[<cyan>${1}<yellow>]<reset>"),
        // interactable props
        (r"\[i:(.+?)\]", "<yellow>[:<magenta>${1}<yellow>:]<reset>"),
        // commands
        (r"\[c:(.+?)\]", "<yellow>\"<green>${1}<yellow>\"<reset>"),
        (r"\[b:(.+?)\]", "<yellow>(<green>${1}<yellow>)<reset>"),
    ]
    .into_iter()
    .map(|(pattern, template)| (Regex::new(pattern).expect("tag pattern is valid"), template))
    .collect()
});

static COLOR_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1b\[\d+m").expect("colour code pattern is valid"));

#[derive(Debug, Clone, Copy)]
enum Specifier {
    PlayerName,
    ServerName,
    Literal(&'static str),
    RandomColor,
}

/// Every specifier in substitution order.
const SPECIFIERS: &[(&str, Specifier)] = &[
    ("<player_name>", Specifier::PlayerName),
    ("<server_name>", Specifier::ServerName),
    ("<cls>", Specifier::Literal("\x1b[2J")),
    ("<reset>", Specifier::Literal("\x1b[0m")),
    ("<bold>", Specifier::Literal("\x1b[1m")),
    ("<dim>", Specifier::Literal("\x1b[2m")),
    ("<underline>", Specifier::Literal("\x1b[4m")),
    ("<blink>", Specifier::Literal("\x1b[5m")),
    ("<inverse>", Specifier::Literal("\x1b[7m")),
    ("<hidden>", Specifier::Literal("\x1b[8m")),
    ("<black>", Specifier::Literal("\x1b[30m")),
    ("<red>", Specifier::Literal("\x1b[31m")),
    ("<green>", Specifier::Literal("\x1b[32m")),
    ("<yellow>", Specifier::Literal("\x1b[33m")),
    ("<blue>", Specifier::Literal("\x1b[34m")),
    ("<magenta>", Specifier::Literal("\x1b[35m")),
    ("<cyan>", Specifier::Literal("\x1b[36m")),
    ("<white>", Specifier::Literal("\x1b[37m")),
    ("<rc>", Specifier::RandomColor),
    ("<sl>", Specifier::Literal("\r\n")),
    ("<dl>", Specifier::Literal("\r\n\r\n")),
    ("<t>", Specifier::Literal("\t")),
    ("<ht>", Specifier::Literal("    ")),
    ("<zws>", Specifier::Literal("\u{200B}")),
];

/// Stage 1: expand authored tags into specifier markup.
///
/// Each tag kind is its own pass over the whole text. Tags do not span lines.
pub fn rewrite_tags(text: &str) -> String {
    TAG_RULES
        .iter()
        .fold(text.to_string(), |acc, (pattern, template)| {
            pattern.replace_all(&acc, *template).into_owned()
        })
}

/// Stage 2: replace specifiers, one table entry at a time.
///
/// Text produced by an earlier entry is visible to later ones, so a player
/// name containing `<red>` is coloured. `<rc>` draws a fresh colour for
/// each occurrence.
pub fn substitute_specifiers<R: Rng>(
    text: &str,
    viewer: &Viewer,
    server_name: &str,
    rng: &mut R,
) -> String {
    let mut out = text.to_string();
    for (token, specifier) in SPECIFIERS {
        if !out.contains(token) {
            continue;
        }
        out = match specifier {
            Specifier::PlayerName => out.replace(token, &viewer.display_name()),
            Specifier::ServerName => out.replace(token, server_name),
            Specifier::Literal(replacement) => out.replace(token, replacement),
            Specifier::RandomColor => {
                let mut pieces = out.split(token);
                let mut joined = pieces.next().unwrap_or_default().to_string();
                for piece in pieces {
                    let code: u8 = rng.gen_range(31..=36);
                    joined.push_str(&format!("\x1b[{code}m"));
                    joined.push_str(piece);
                }
                joined
            }
        };
    }
    out
}

/// Stage 3: drop colour codes and non-ASCII characters the viewer cannot display.
pub fn gate_capabilities(text: &str, viewer: &Viewer) -> String {
    let mut out = if viewer.supports_color {
        text.to_string()
    } else {
        COLOR_CODE.replace_all(text, "").into_owned()
    };
    if !viewer.supports_high_ascii {
        out.retain(|ch| ch.is_ascii());
    }
    out
}

/// Renders markup for a server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formatter {
    server_name: String,
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new(DEFAULT_SERVER_NAME)
    }
}

impl Formatter {
    pub fn new(server_name: impl Into<String>) -> Self {
        Self {
            server_name: server_name.into(),
        }
    }

    pub fn server_name(&self) -> &str {
        &self.server_name
    }

    /// Run all three stages using the thread-local RNG for `<rc>`.
    pub fn format(&self, text: &str, viewer: &Viewer) -> String {
        self.format_with_rng(text, viewer, &mut rand::thread_rng())
    }

    /// Run all three stages with a caller-supplied RNG.
    pub fn format_with_rng<R: Rng>(
        &self,
        text: &str,
        viewer: &Viewer,
        rng: &mut R,
    ) -> String {
        let tagged = rewrite_tags(text);
        let substituted = substitute_specifiers(&tagged, viewer, &self.server_name, rng);
        gate_capabilities(&substituted, viewer)
    }
}

/// Format `text` for `viewer` with the default server name.
pub fn format_text(text: &str, viewer: &Viewer) -> String {
    Formatter::default().format(text, viewer)
}
