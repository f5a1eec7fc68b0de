// Criterion benchmarks for Lume Semantic

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use lume_semantic::core::{
    apply_filters, cosine_similarity, describe_profile, Encoder, FilterExtractor, HashEncoder,
    QueryEnhancer, Ranker,
};
use lume_semantic::models::{Profile, RelationshipType};
use std::collections::HashMap;
use std::sync::Arc;

const QUERY: &str = "Looking for someone in Austin between 25 and 35 who loves hiking and cooking";

fn create_candidate(id: usize) -> Profile {
    Profile {
        id: id.to_string(),
        name: format!("User {}", id),
        age: 20 + (id % 30) as u32,
        location: if id % 3 == 0 { "Austin, TX" } else { "Denver, CO" }.to_string(),
        interests: vec!["hiking".to_string(), "coffee".to_string(), "music".to_string()],
        profession: "Engineer".to_string(),
        education: "BS".to_string(),
        relationship_type: if id % 2 == 0 {
            RelationshipType::Serious
        } else {
            RelationshipType::Casual
        },
        bio: "Weekend hikes, strong coffee and live music downtown.".to_string(),
        preferences: HashMap::new(),
    }
}

fn bench_enhance(c: &mut Criterion) {
    let enhancer = QueryEnhancer::new().unwrap();
    c.bench_function("enhance_query", |b| {
        b.iter(|| enhancer.enhance(black_box(QUERY)));
    });
}

fn bench_extract(c: &mut Criterion) {
    let extractor = FilterExtractor::new().unwrap();
    c.bench_function("extract_filters", |b| {
        b.iter(|| extractor.extract(black_box(QUERY)));
    });
}

fn bench_apply_filters(c: &mut Criterion) {
    let filters = FilterExtractor::new().unwrap().extract(QUERY);
    let candidates: Vec<Profile> = (0..1000).map(create_candidate).collect();

    c.bench_function("apply_filters_1000_candidates", |b| {
        b.iter(|| apply_filters(black_box(candidates.clone()), black_box(&filters)));
    });
}

fn bench_encode_and_similarity(c: &mut Criterion) {
    let encoder = HashEncoder::default();
    let texts: Vec<String> = (0..100).map(|i| describe_profile(&create_candidate(i))).collect();
    let vectors = encoder.embed(&texts).unwrap();

    c.bench_function("hash_encode_100_descriptions", |b| {
        b.iter(|| encoder.embed(black_box(&texts)));
    });

    c.bench_function("cosine_similarity_384", |b| {
        b.iter(|| cosine_similarity(black_box(&vectors[0]), black_box(&vectors[1])));
    });
}

fn bench_rank(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let ranker = Ranker::new(Arc::new(HashEncoder::default()), None);

    let mut group = c.benchmark_group("rank");

    for candidate_count in [10, 100, 1000].iter() {
        let candidates: Vec<Profile> = (0..*candidate_count).map(create_candidate).collect();

        group.bench_with_input(
            BenchmarkId::new("rank", candidate_count),
            candidate_count,
            |b, _| {
                b.iter(|| {
                    runtime.block_on(ranker.rank(
                        black_box(QUERY),
                        black_box(candidates.clone()),
                        black_box(20),
                    ))
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_enhance,
    bench_extract,
    bench_apply_filters,
    bench_encode_and_similarity,
    bench_rank
);

criterion_main!(benches);
