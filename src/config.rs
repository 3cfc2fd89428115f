// Input
pub const DEFAULT_DATASET: &str = "season-2324.csv";

/// Cell texts treated as missing when reading CSV (the pandas default set).
pub const NA_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

// Net
pub const USER_AGENT: &str = concat!("pitchside/", env!("CARGO_PKG_VERSION"));

// Figures
pub const FIGURE_SIZE: (u32, u32) = (640, 480);
pub const FIGURE_DPI: f64 = 100.0;
pub const CAPTION_FONT_SIZE: u32 = 20;
pub const DEFAULT_FIGURE_EXT: &str = "png";
