//! 工具函数性能基准测试

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use nepstay::services::HostelPayload;
use nepstay::utils::url_validator::validate_url;
use nepstay::utils::validation::{is_valid_email, is_valid_whatsapp};
use nepstay::utils::{generate_slug, slug::slugify};
use std::hint::black_box;

// ============== slug 基准测试 ==============

fn bench_slug(c: &mut Criterion) {
    let mut group = c.benchmark_group("utils/slug");

    for name in [
        "Zostel",
        "Kathmandu Backpackers Hostel & Rooftop Bar",
        "  Zostel -- Thamel__Inn   with   lots   of   spaces  ",
    ] {
        group.bench_with_input(BenchmarkId::new("slugify", name.len()), name, |b, name| {
            b.iter(|| slugify(black_box(name)));
        });
    }

    group.bench_function("generate_slug", |b| {
        b.iter(|| generate_slug(black_box("Kathmandu Backpackers")));
    });

    group.finish();
}

// ============== 字段校验基准测试 ==============

fn bench_field_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("utils/validation");

    group.bench_function("email_valid", |b| {
        b.iter(|| assert!(is_valid_email(black_box("desk@kathmandu-backpackers.com"))));
    });

    group.bench_function("whatsapp_valid", |b| {
        b.iter(|| assert!(is_valid_whatsapp(black_box("+977 984-123-4567"))));
    });

    group.bench_function("image_url", |b| {
        b.iter(|| validate_url(black_box("https://images.example.com/hostels/1.jpg")).is_ok());
    });

    group.finish();
}

// ============== 请求体校验基准测试 ==============

fn bench_payload_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("services/hostel_payload");

    let body = serde_json::json!({
        "name": "Kathmandu Backpackers",
        "description": "Cozy dorms in the heart of Thamel",
        "images": ["https://img.example.com/a.jpg", "https://img.example.com/b.jpg"],
        "pricePerNight": 850,
        "totalBeds": 24,
        "contactInfo": {"email": "hello@kbp.com", "whatsapp": "+9779841234567"},
        "location": {"city": "Kathmandu", "area": "Thamel"},
        "facilities": ["WiFi", "Hot Water", "Lockers", "Rooftop"]
    });

    group.bench_function("into_new_hostel", |b| {
        b.iter(|| {
            let payload: HostelPayload = serde_json::from_value(body.clone()).unwrap();
            assert!(payload.into_new_hostel().is_ok());
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_slug,
    bench_field_validation,
    bench_payload_validation
);
criterion_main!(benches);
