//! Procedural tile swatches.
//!
//! Stock tiles have no photographs; their images are 512x512 SVGs drawn
//! from a small family of generators. Random detail (wood grain, concrete
//! speckle) is seeded from the key, so a key always yields the same bytes
//! and the response can be cached forever.

use std::hash::{Hash, Hasher};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHasher;

use showroom_core::{Finish, Tile, TileCategory};

/// Swatch edge length in pixels.
pub const SWATCH_SIZE: u32 = 512;

/// Cache header for swatch responses.
pub const SWATCH_CACHE_CONTROL: &str = "public, max-age=31536000, immutable";

pub const SWATCH_CONTENT_TYPE: &str = "image/svg+xml";

/// Image references of stock tiles are `/api/textures/{key}`.
pub const SWATCH_URL_PREFIX: &str = "/api/textures/";

/// A generated swatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Swatch {
    pub key: String,
    pub svg: String,
}

#[derive(Debug, Clone, Copy)]
enum Style {
    Marble { base: &'static str, vein: &'static str, vein_dark: &'static str },
    Wood { base: &'static str, grain: &'static str },
    Concrete { base: &'static str, speckle: &'static str },
    Solid { base: &'static str, edge: &'static str },
    HexMosaic { base: &'static str, grout: &'static str },
    PennyMosaic { base: &'static str, grout: &'static str },
}

impl Style {
    fn base(&self) -> &'static str {
        match *self {
            Style::Marble { base, .. }
            | Style::Wood { base, .. }
            | Style::Concrete { base, .. }
            | Style::Solid { base, .. }
            | Style::HexMosaic { base, .. }
            | Style::PennyMosaic { base, .. } => base,
        }
    }
}

struct StockTile {
    key: &'static str,
    name: &'static str,
    collection: &'static str,
    category: TileCategory,
    width: u32,
    height: u32,
    finish: Finish,
    style: Style,
}

const FALLBACK: Style = Style::Solid { base: "#808080", edge: "#707070" };

macro_rules! stock {
    ($key:literal, $name:literal, $collection:literal, $category:ident, $w:literal x $h:literal, $finish:ident, $style:expr) => {
        StockTile {
            key: $key,
            name: $name,
            collection: $collection,
            category: TileCategory::$category,
            width: $w,
            height: $h,
            finish: Finish::$finish,
            style: $style,
        }
    };
}

const STOCK: &[StockTile] = &[
    stock!("marble-white", "Carrara White", "Marble", Floor, 600 x 600, Glossy,
        Style::Marble { base: "#f5f5f5", vein: "#e0e0e0", vein_dark: "#d0d0d0" }),
    stock!("marble-gold", "Calacatta Gold", "Marble", Floor, 600 x 600, Glossy,
        Style::Marble { base: "#f5f0e0", vein: "#e8d4a0", vein_dark: "#d4b070" }),
    stock!("marble-dark", "Emperador Dark", "Marble", Floor, 600 x 600, Glossy,
        Style::Marble { base: "#4a3c32", vein: "#5c4a3a", vein_dark: "#3a2e26" }),
    stock!("wood-oak", "Natural Oak", "Wood", Floor, 1200 x 200, Matte,
        Style::Wood { base: "#c4a77d", grain: "#a88a5b" }),
    stock!("wood-walnut", "Walnut", "Wood", Floor, 1200 x 200, Matte,
        Style::Wood { base: "#5c4033", grain: "#3d2817" }),
    stock!("wood-grey", "Weathered Grey", "Wood", Floor, 1200 x 200, Textured,
        Style::Wood { base: "#8a8a8a", grain: "#6a6a6a" }),
    stock!("concrete-grey", "Concrete Grey", "Concrete", Floor, 600 x 600, Textured,
        Style::Concrete { base: "#808080", speckle: "#707070" }),
    stock!("concrete-charcoal", "Concrete Charcoal", "Concrete", Floor, 600 x 600, Textured,
        Style::Concrete { base: "#4a4a4a", speckle: "#3a3a3a" }),
    stock!("ceramic-white", "Subway White", "Ceramic", Wall, 300 x 150, Glossy,
        Style::Solid { base: "#ffffff", edge: "#f0f0f0" }),
    stock!("ceramic-black", "Subway Black", "Ceramic", Wall, 300 x 150, Glossy,
        Style::Solid { base: "#1a1a1a", edge: "#2a2a2a" }),
    stock!("ceramic-green", "Sage Green", "Ceramic", Wall, 150 x 150, Glossy,
        Style::Solid { base: "#7fa87f", edge: "#6a956a" }),
    stock!("ceramic-blue", "Navy Blue", "Ceramic", Wall, 150 x 150, Glossy,
        Style::Solid { base: "#2c4a6e", edge: "#1e3a5e" }),
    stock!("mosaic-hex-white", "Hexagon White", "Mosaic", Wall, 300 x 300, Matte,
        Style::HexMosaic { base: "#ffffff", grout: "#e8e8e8" }),
    stock!("mosaic-penny-black", "Penny Round Black", "Mosaic", Wall, 300 x 300, Matte,
        Style::PennyMosaic { base: "#2a2a2a", grout: "#1a1a1a" }),
    stock!("slab-statuario", "Statuario Slab", "Large Format", Floor, 1200 x 2400, Glossy,
        Style::Marble { base: "#fafafa", vein: "#e8e8e8", vein_dark: "#d8d8d8" }),
    stock!("slab-onyx", "Honey Onyx Slab", "Large Format", Floor, 1200 x 2400, Glossy,
        Style::Marble { base: "#f0e8d8", vein: "#e0d0b8", vein_dark: "#d0c0a0" }),
];

/// The built-in catalog, each tile pointing at its swatch.
pub fn stock_tiles() -> Vec<Tile> {
    STOCK
        .iter()
        .map(|s| {
            Tile::new(
                s.key,
                s.name,
                s.category,
                s.width,
                s.height,
                s.finish,
                format!("{}{}", SWATCH_URL_PREFIX, s.key),
            )
            .with_collection(s.collection)
            .with_color(s.style.base())
            .preloaded()
        })
        .collect()
}

/// Whether `key` names a stock swatch rather than the grey fallback.
pub fn is_known_swatch(key: &str) -> bool {
    STOCK.iter().any(|s| s.key == key)
}

/// Generate the swatch for `key`. Unknown keys get a neutral grey tile.
pub fn generate_swatch(key: &str) -> Swatch {
    let style = STOCK
        .iter()
        .find(|s| s.key == key)
        .map(|s| s.style)
        .unwrap_or(FALLBACK);

    let mut builder = SvgBuilder::new(seed_for(key));
    builder.draw(style);

    Swatch {
        key: key.to_string(),
        svg: builder.finish(),
    }
}

fn seed_for(key: &str) -> u64 {
    let mut hasher = FxHasher::default();
    key.hash(&mut hasher);
    hasher.finish()
}

struct SvgBuilder {
    svg: String,
    rng: StdRng,
}

impl SvgBuilder {
    fn new(seed: u64) -> Self {
        let mut svg = String::new();
        svg.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{0}" height="{0}" viewBox="0 0 {0} {0}">"#,
            SWATCH_SIZE
        ));
        svg.push('\n');
        Self {
            svg,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn line(&mut self, element: &str) {
        self.svg.push_str("  ");
        self.svg.push_str(element);
        self.svg.push('\n');
    }

    fn background(&mut self, fill: &str) {
        self.line(&format!(r#"<rect width="{0}" height="{0}" fill="{1}"/>"#, SWATCH_SIZE, fill));
    }

    fn draw(&mut self, style: Style) {
        match style {
            Style::Marble { base, vein, vein_dark } => self.marble(base, vein, vein_dark),
            Style::Wood { base, grain } => self.wood(base, grain),
            Style::Concrete { base, speckle } => self.concrete(base, speckle),
            Style::Solid { base, edge } => self.solid(base, edge),
            Style::HexMosaic { base, grout } => self.hex_mosaic(base, grout),
            Style::PennyMosaic { base, grout } => self.penny_mosaic(base, grout),
        }
    }

    fn marble(&mut self, base: &str, vein: &str, vein_dark: &str) {
        self.line("<defs>");
        self.line(r#"  <filter id="noise" x="0" y="0" width="100%" height="100%"><feTurbulence type="fractalNoise" baseFrequency="0.02" numOctaves="4" result="noise"/><feDisplacementMap in="SourceGraphic" in2="noise" scale="20" xChannelSelector="R" yChannelSelector="G"/></filter>"#);
        self.line(&format!(
            r#"  <linearGradient id="vein" x1="0%" y1="0%" x2="100%" y2="100%"><stop offset="0%" stop-color="{0}" stop-opacity="0.3"/><stop offset="50%" stop-color="{1}" stop-opacity="0.5"/><stop offset="100%" stop-color="{0}" stop-opacity="0.3"/></linearGradient>"#,
            vein, vein_dark
        ));
        self.line("</defs>");
        self.background(base);
        for (path, width) in [
            ("M0,100 Q128,80 256,120 T512,100", 8),
            ("M0,250 Q150,200 300,280 T512,240", 6),
            ("M0,400 Q200,350 350,420 T512,380", 10),
        ] {
            self.line(&format!(
                r#"<path d="{}" stroke="url(#vein)" stroke-width="{}" fill="none" filter="url(#noise)"/>"#,
                path, width
            ));
        }
        self.line(&format!(r#"<rect width="{0}" height="{0}" fill="{1}" opacity="0.1"/>"#, SWATCH_SIZE, base));
    }

    fn wood(&mut self, base: &str, grain: &str) {
        self.background(base);
        for i in 0..20 {
            let y = i as f32 * 25.0 + self.rng.random_range(0.0..10.0);
            let drift = self.rng.random_range(0.0..5.0);
            let width = self.rng.random_range(1.0..3.0);
            let opacity = self.rng.random_range(0.3..0.7);
            self.line(&format!(
                r#"<line x1="0" y1="{:.2}" x2="{}" y2="{:.2}" stroke="{}" stroke-width="{:.2}" opacity="{:.2}"/>"#,
                y,
                SWATCH_SIZE,
                y + drift,
                grain,
                width,
                opacity
            ));
        }
    }

    fn concrete(&mut self, base: &str, speckle: &str) {
        self.line("<defs>");
        self.line(r#"  <filter id="noise"><feTurbulence type="fractalNoise" baseFrequency="0.05" numOctaves="3"/><feColorMatrix type="saturate" values="0"/><feBlend in="SourceGraphic" mode="multiply"/></filter>"#);
        self.line("</defs>");
        self.background(base);
        let size = SWATCH_SIZE as f32;
        for _ in 0..100 {
            let x = self.rng.random_range(0.0..size);
            let y = self.rng.random_range(0.0..size);
            let r = self.rng.random_range(1.0..4.0);
            let opacity = self.rng.random_range(0.2..0.5);
            self.line(&format!(
                r#"<circle cx="{:.2}" cy="{:.2}" r="{:.2}" fill="{}" opacity="{:.2}"/>"#,
                x, y, r, speckle, opacity
            ));
        }
        self.line(&format!(
            r#"<rect width="{0}" height="{0}" fill="{1}" opacity="0.3" filter="url(#noise)"/>"#,
            SWATCH_SIZE, base
        ));
    }

    fn solid(&mut self, base: &str, edge: &str) {
        self.background(base);
        self.line(&format!(
            r#"<rect x="2" y="2" width="{0}" height="{0}" fill="none" stroke="{1}" stroke-width="4"/>"#,
            SWATCH_SIZE - 4,
            edge
        ));
    }

    fn hex_mosaic(&mut self, base: &str, grout: &str) {
        const HEX: f32 = 40.0;
        let row_step = HEX * 3f32.sqrt() * 0.5;

        self.background(grout);
        for row in 0..15 {
            for col in 0..10 {
                let x = col as f32 * HEX * 1.5 + (row % 2) as f32 * HEX * 0.75;
                let y = row as f32 * row_step;
                let points = [
                    (x, y + HEX * 0.5),
                    (x + HEX * 0.25, y),
                    (x + HEX * 0.75, y),
                    (x + HEX, y + HEX * 0.5),
                    (x + HEX * 0.75, y + HEX),
                    (x + HEX * 0.25, y + HEX),
                ]
                .iter()
                .map(|(px, py)| format!("{:.1},{:.1}", px, py))
                .collect::<Vec<_>>()
                .join(" ");
                self.line(&format!(
                    r#"<polygon points="{}" fill="{}" stroke="{}" stroke-width="3"/>"#,
                    points, base, grout
                ));
            }
        }
    }

    fn penny_mosaic(&mut self, base: &str, grout: &str) {
        const PENNY: f32 = 24.0;

        self.background(grout);
        for row in 0..22 {
            for col in 0..22 {
                let x = col as f32 * PENNY + (row % 2) as f32 * PENNY * 0.5;
                let y = row as f32 * PENNY * 0.866;
                self.line(&format!(
                    r#"<circle cx="{:.1}" cy="{:.1}" r="{:.1}" fill="{}"/>"#,
                    x,
                    y,
                    PENNY * 0.4,
                    base
                ));
            }
        }
    }

    fn finish(mut self) -> String {
        self.svg.push_str("</svg>\n");
        self.svg
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_deterministic_per_key() {
        for key in ["wood-oak", "concrete-grey", "marble-white", "unknown"] {
            assert_eq!(generate_swatch(key), generate_swatch(key));
        }
        assert_ne!(generate_swatch("wood-oak").svg, generate_swatch("wood-walnut").svg);
    }

    #[test]
    fn test_unknown_key_falls_back_to_grey() {
        let swatch = generate_swatch("granite-pink");
        assert!(!is_known_swatch("granite-pink"));
        assert!(swatch.svg.contains(r##"fill="#808080""##));
        assert!(swatch.svg.contains(r##"stroke="#707070""##));
    }

    #[test]
    fn test_svg_shape() {
        let svg = generate_swatch("mosaic-hex-white").svg;
        assert!(svg.starts_with("<svg "));
        assert!(svg.contains(r#"width="512" height="512""#));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert_eq!(svg.matches("<polygon").count(), 150);

        let penny = generate_swatch("mosaic-penny-black").svg;
        assert_eq!(penny.matches("<circle").count(), 22 * 22);
    }

    #[test]
    fn test_stock_tiles() {
        let tiles = stock_tiles();
        assert_eq!(tiles.len(), 16);
        assert!(tiles.iter().all(|t| t.is_preloaded && is_known_swatch(t.id.as_str())));

        let marble = tiles.iter().find(|t| t.id.as_str() == "marble-white").unwrap();
        assert_eq!(marble.image_url, "/api/textures/marble-white");
        assert_eq!((marble.width, marble.height), (600, 600));
        assert_eq!(marble.color.as_deref(), Some("#f5f5f5"));
    }

    proptest! {
        #[test]
        fn prop_any_key_yields_grey_or_stock_svg(key in "[a-z-]{0,24}") {
            let swatch = generate_swatch(&key);
            prop_assert!(swatch.svg.starts_with("<svg "));
            prop_assert!(swatch.svg.trim_end().ends_with("</svg>"));
            if !is_known_swatch(&key) {
                prop_assert!(swatch.svg.contains("#808080"));
            }
        }
    }
}
