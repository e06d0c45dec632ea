use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pdf_lock::encryption::algorithms::derive_object_key;
use pdf_lock::encryption::rc4::rc4_crypt;
use pdf_lock::encryption::{apply_standard_encryption_with_file_id, KeyMaterial};
use pdf_lock::{Dictionary, Document, EncryptionOptions, Object, ObjectRef, Stream};

fn bench_rc4(c: &mut Criterion) {
    let mut group = c.benchmark_group("encryption/rc4");
    let key = [0x7a, 0x20, 0xdf, 0xb6, 0x15];

    for size in [100, 1024, 10240, 102400].iter() {
        let data = vec![42u8; *size];

        group.bench_with_input(BenchmarkId::new("crypt", size), size, |b, _| {
            b.iter(|| rc4_crypt(black_box(&key), black_box(&data)).ok())
        });
    }

    group.finish();
}

fn bench_key_derivation(c: &mut Criterion) {
    let mut group = c.benchmark_group("encryption/keys");
    let options = EncryptionOptions::new("secret").with_owner_password("owner");

    group.bench_function("key_material", |b| {
        b.iter(|| KeyMaterial::derive(black_box(&options), black_box([7u8; 16])).ok())
    });

    let key = [0x7a, 0x20, 0xdf, 0xb6, 0x15];
    group.bench_function("object_key", |b| {
        b.iter(|| derive_object_key(black_box(&key), black_box(ObjectRef::new(1234, 0))))
    });

    group.finish();
}

/// A flat document: `count` pages, each a dictionary with a title string and a content stream.
fn build_document(count: usize) -> Document {
    let mut doc = Document::new();
    let mut kids = Vec::with_capacity(count);

    for i in 0..count {
        let content = doc
            .register(Stream::new(
                Dictionary::new(),
                format!("BT /F1 12 Tf 72 720 Td (Page {}) Tj ET", i).into_bytes(),
            ))
            .unwrap();
        let mut page = Dictionary::new();
        page.insert("Type".to_string(), Object::name("Page"));
        page.insert("Title".to_string(), Object::String(format!("Page {}", i).into_bytes()));
        page.insert("Contents".to_string(), Object::Reference(content));
        kids.push(Object::Reference(doc.register(page).unwrap()));
    }

    let mut catalog = Dictionary::new();
    catalog.insert("Type".to_string(), Object::name("Catalog"));
    catalog.insert("Kids".to_string(), Object::Array(kids));
    let root = doc.register(catalog).unwrap();
    doc.trailer_mut().root = Some(root);
    doc
}

fn bench_document_encryption(c: &mut Criterion) {
    let mut group = c.benchmark_group("encryption/document");
    let options = EncryptionOptions::new("secret");

    for pages in [10, 100, 1000].iter() {
        let doc = build_document(*pages);

        group.bench_with_input(BenchmarkId::new("apply", pages), pages, |b, _| {
            b.iter(|| {
                let mut doc = doc.clone();
                apply_standard_encryption_with_file_id(&mut doc, black_box(&options), [7u8; 16])
                    .ok()
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_rc4, bench_key_derivation, bench_document_encryption,);

criterion_main!(benches);
