use std::collections::HashMap;

use serde::Serialize;

use super::CategoryDefinition;

/// 80% alpha suffix appended to fill colors; borders stay opaque.
const FILL_ALPHA: &str = "CC";

/// Neutral gray returned for any name the configuration does not cover.
const FALLBACK_GRAY: &str = "#9aa0a6";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColorPair {
    pub fill: String,
    pub border: String,
}

/// Deterministic name-to-color assignment, memoized up front. A pure
/// function of the category configuration: rebuilding from the same input
/// yields byte-identical strings. Owned by the application state and
/// rebuilt only on configuration reload.
#[derive(Debug, Clone)]
pub struct ColorCache {
    category_colors: HashMap<String, ColorPair>,
    task_colors: HashMap<String, ColorPair>,
    fallback: ColorPair,
}

impl ColorCache {
    pub fn new(categories: &[CategoryDefinition]) -> Self {
        let mut category_colors = HashMap::new();
        let mut task_colors = HashMap::new();

        for category in categories {
            let base = normalize_hex(&category.color).unwrap_or_else(|| FALLBACK_GRAY.to_string());
            category_colors.insert(category.name.clone(), pair(&base));

            // Tasks fan out around the category base color: earlier tasks
            // darker, later tasks lighter, the middle task unchanged.
            let count = category.tasks.len() as i32;
            for (i, task) in category.tasks.iter().enumerate() {
                let percent = (i as i32 - count / 2) * 15;
                let shaded = shade(&base, percent);
                task_colors.entry(task.clone()).or_insert_with(|| pair(&shaded));
            }
        }

        Self {
            category_colors,
            task_colors,
            fallback: pair(FALLBACK_GRAY),
        }
    }

    pub fn category_color(&self, name: &str) -> &ColorPair {
        self.category_colors.get(name).unwrap_or(&self.fallback)
    }

    pub fn task_color(&self, name: &str) -> &ColorPair {
        self.task_colors.get(name).unwrap_or(&self.fallback)
    }
}

fn pair(base: &str) -> ColorPair {
    ColorPair {
        fill: format!("{}{}", base, FILL_ALPHA),
        border: base.to_string(),
    }
}

/// Scale each RGB channel by `(100 + percent) / 100`, clamped to `[0, 255]`.
fn shade(base: &str, percent: i32) -> String {
    let Some((r, g, b)) = parse_hex(base) else {
        return FALLBACK_GRAY.to_string();
    };
    let scale = |channel: u8| -> u8 {
        let scaled = channel as f64 * (100 + percent) as f64 / 100.0;
        scaled.round().clamp(0.0, 255.0) as u8
    };
    format!("#{:02x}{:02x}{:02x}", scale(r), scale(g), scale(b))
}

fn normalize_hex(raw: &str) -> Option<String> {
    parse_hex(raw).map(|(r, g, b)| format!("#{:02x}{:02x}{:02x}", r, g, b))
}

fn parse_hex(raw: &str) -> Option<(u8, u8, u8)> {
    let digits = raw.trim().strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
    let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
    let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
    Some((r, g, b))
}
