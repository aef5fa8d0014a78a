//! Benchmarks for sidenote and math post-processing.

#![allow(clippy::format_push_string)] // Benchmark setup code, performance not critical

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use margin_renderer::{PageRenderer, postprocess};

/// Generate rendered HTML with sidenotes, math and code blocks.
fn generate_html(sections: usize) -> String {
    let mut html = String::with_capacity(sections * 400);
    for i in 0..sections {
        html.push_str(&format!(
            "<h2>Section {i}</h2><p>Paragraph {i} with a note{{sidenote note {i}}} and $x_{i}$.</p>"
        ));
        html.push_str("<pre><code class=\"language-rust\">let s = \"{sidenote skip}\";</code></pre>");
        html.push_str(&format!(
            "<p>{{sidenote}}Block note {i} spanning\nseveral lines.{{/sidenote}} Use <code>$HOME</code>.</p>"
        ));
    }
    html
}

/// Generate markdown with the same features.
fn generate_markdown(sections: usize) -> String {
    let mut md = String::with_capacity(sections * 300);
    md.push_str("---\ntitle: Bench\n---\n# Document Title\n\n");
    for i in 0..sections {
        md.push_str(&format!(
            "## Section {i}\n\nParagraph {i}{{sidenote note {i}}} with $y_{i}$.\n\n"
        ));
        md.push_str("```rust\nlet s = \"{sidenote skip}\";\n```\n\n");
        md.push_str(&format!("{{sidenote}}\nBlock note {i}.\n{{/sidenote}}\n\n"));
    }
    md
}

fn bench_postprocess_plain(c: &mut Criterion) {
    let html = "<p>Plain paragraph without any directives.</p>".repeat(200);

    c.bench_function("postprocess_no_directives", |b| {
        b.iter(|| postprocess(html.as_bytes()));
    });
}

fn bench_postprocess_by_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("postprocess_by_size");

    for sections in [10, 100, 1000] {
        let html = generate_html(sections);
        group.throughput(Throughput::Bytes(html.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("sections", sections),
            &html,
            |b, html| b.iter(|| postprocess(html.as_bytes())),
        );
    }

    group.finish();
}

fn bench_render_page(c: &mut Criterion) {
    let renderer = PageRenderer::default();
    let markdown = generate_markdown(50);

    c.bench_function("render_page_50_sections", |b| {
        b.iter(|| renderer.render(&markdown));
    });
}

criterion_group!(
    benches,
    bench_postprocess_plain,
    bench_postprocess_by_size,
    bench_render_page
);
criterion_main!(benches);
