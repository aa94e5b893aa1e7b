//! Label color resolution against the fixed mail-store palette.

/// Background/text display pair for a label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelColor {
    pub background: &'static str,
    pub text: &'static str,
}

/// Default gray pair used for unknown color names
pub const DEFAULT_COLOR: LabelColor = LabelColor {
    background: "#cccccc",
    text: "#000000",
};

/// Resolve a color name to a display pair. The mail store only accepts
/// colors from its fixed palette, so unknown names fall back to gray
/// rather than erroring.
pub fn resolve(name: &str) -> LabelColor {
    match name.to_lowercase().as_str() {
        "red" => LabelColor {
            background: "#fb4c2f",
            text: "#ffffff",
        },
        "orange" => LabelColor {
            background: "#ffad47",
            text: "#000000",
        },
        "yellow" => LabelColor {
            background: "#fad165",
            text: "#000000",
        },
        "green" => LabelColor {
            background: "#16a766",
            text: "#ffffff",
        },
        "teal" => LabelColor {
            background: "#2da2bb",
            text: "#ffffff",
        },
        "blue" => LabelColor {
            background: "#4a86e8",
            text: "#ffffff",
        },
        "purple" => LabelColor {
            background: "#a479e2",
            text: "#ffffff",
        },
        "pink" => LabelColor {
            background: "#f691b3",
            text: "#000000",
        },
        "brown" => LabelColor {
            background: "#b65775",
            text: "#ffffff",
        },
        "gray" | "grey" => DEFAULT_COLOR,
        _ => DEFAULT_COLOR,
    }
}
