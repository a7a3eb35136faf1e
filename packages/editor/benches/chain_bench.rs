use criterion::{black_box, criterion_group, criterion_main, Criterion};
use folio_editor::{CoreCommands, Editor, EditorConfig};
use folio_model::{Document, Node};

fn editor_with_paragraphs(count: usize) -> Editor {
    let paragraphs = (0..count)
        .map(|i| {
            Node::element(
                format!("p{}", i),
                "paragraph",
                vec![Node::text(format!("t{}", i), "lorem ipsum dolor sit amet")],
            )
        })
        .collect();

    Editor::new(EditorConfig::default().with_content(Document::new(paragraphs))).unwrap()
}

fn chain_short(c: &mut Criterion) {
    let mut editor = editor_with_paragraphs(10);

    c.bench_function("chain_insert_and_check", |b| {
        b.iter(|| {
            editor
                .chain()
                .insert_text(black_box("ab"))
                .doc_length_at_least(2)
                .run()
                .unwrap()
        })
    });
}

fn chain_long(c: &mut Criterion) {
    let mut editor = editor_with_paragraphs(200);

    c.bench_function("chain_twenty_steps", |b| {
        b.iter(|| {
            let mut chain = editor.chain();
            for _ in 0..20 {
                chain.insert_text(black_box("x"));
            }
            chain.run().unwrap()
        })
    });
}

fn dry_run(c: &mut Criterion) {
    let editor = editor_with_paragraphs(200);

    c.bench_function("can_chain", |b| {
        b.iter(|| {
            editor
                .can()
                .chain()
                .set_text_selection("t5", 0, 5)
                .delete_selection()
                .has_text(black_box("ipsum"))
                .run()
                .unwrap()
        })
    });
}

criterion_group!(benches, chain_short, chain_long, dry_run);
criterion_main!(benches);
