//! Benchmarks for the yapp pipeline.
//!
//! Run with: cargo bench
//!
//! Synthetic glyph pages exercise the lexer, parser and renderer
//! without touching PDF byte parsing.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use yapp::{parse_source, Glyph, GlyphSource, Result};

struct SyntheticPages(Vec<Vec<Glyph>>);

impl GlyphSource for SyntheticPages {
    fn page_count(&self) -> u32 {
        self.0.len() as u32
    }

    fn glyphs(&self, page: u32) -> Result<Vec<Glyph>> {
        Ok(self.0[(page - 1) as usize].clone())
    }
}

fn glyph(text: &str, x: f32, y: f32, size: f32) -> Glyph {
    Glyph {
        text: text.to_string(),
        x,
        y,
        width: 0.0,
        font: "Regular".to_string(),
        font_size: size,
    }
}

/// A page mixing a heading, paragraphs, a bullet list and a table.
fn mixed_page() -> Vec<Glyph> {
    let mut glyphs = vec![glyph("Quarterly Stock Report", 72.0, 740.0, 20.0)];

    let mut y = 710.0;
    for _ in 0..8 {
        let mut x = 72.0;
        for word in ["The", "warehouse", "holds", "several", "catalogued", "items."] {
            glyphs.push(glyph(word, x, y, 12.0));
            x += word.len() as f32 * 7.2 + 12.0;
        }
        y -= 14.0;
    }

    y -= 14.0;
    for item in ["restock weekly", "audit monthly", "report quarterly"] {
        glyphs.push(glyph("•", 72.0, y, 12.0));
        glyphs.push(glyph(item, 90.0, y, 12.0));
        y -= 14.0;
    }

    y -= 20.0;
    let xs = [72.0, 200.0, 320.0, 440.0];
    for (text, x) in ["SKU", "Description", "Unit", "Price"].iter().zip(xs) {
        glyphs.push(glyph(text, x, y, 7.0));
    }
    for row in 0..6 {
        y -= 16.0;
        let sku = format!("AB-{:03}", 100 + row);
        glyphs.push(glyph(&sku, 72.0, y, 7.0));
        glyphs.push(glyph("Widget", 200.0, y, 7.0));
        glyphs.push(glyph("each", 320.0, y, 7.0));
        glyphs.push(glyph("9.50", 440.0, y, 7.0));
    }

    glyphs
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");

    for page_count in [1usize, 5, 10] {
        let source = SyntheticPages(vec![mixed_page(); page_count]);

        group.bench_function(format!("{}_pages", page_count), |b| {
            b.iter(|| parse_source(black_box(&source)).unwrap());
        });
    }

    group.finish();
}

fn bench_render_only(c: &mut Criterion) {
    let source = SyntheticPages(vec![mixed_page(); 5]);
    let document = parse_source(&source).unwrap().document;

    c.bench_function("render_5_pages", |b| {
        b.iter(|| {
            yapp::render::to_markdown(black_box(&document), &yapp::RenderOptions::default())
        });
    });
}

criterion_group!(benches, bench_pipeline, bench_render_only);
criterion_main!(benches);
