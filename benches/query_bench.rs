use {
    criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main},
    e6post::{
        models::{Post, PostsResponse, decode},
        query::{Blacklist, TagQuery},
        rating::Rating,
        search::{Order, PostsSearchOptions},
    },
    serde_json::json,
    std::{hint::black_box, time::Duration},
};

fn post_json(id: i64) -> serde_json::Value {
    let (up, down) = (id % 40, -(id % 7));
    let species = if id % 2 == 0 { "canid" } else { "felid" };
    let rating = if id % 3 == 0 { "e" } else { "s" };

    json!({
        "id": id,
        "created_at": "2022-08-01T12:00:00.000-04:00",
        "updated_at": null,
        "file": {
            "width": 1920,
            "height": 1080,
            "ext": "png",
            "size": 577161,
            "md5": "0123456789abcdef0123456789abcdef",
            "url": null
        },
        "score": { "up": up, "down": down, "total": up + down },
        "tags": {
            "general": ["sketch_page", "solo", "smile"],
            "species": [species],
            "character": [],
            "copyright": ["twokinds"],
            "artist": ["tom_fischbach"],
            "contributor": [],
            "invalid": [],
            "lore": [],
            "meta": ["2022", "monochrome"]
        },
        "rating": rating,
        "fav_count": id % 100,
        "description": "",
        "relationships": {
            "parent_id": null,
            "has_children": false,
            "has_active_children": false,
            "children": []
        }
    })
}

fn response_json(size: usize) -> String {
    let posts: Vec<_> = (0..size as i64).map(post_json).collect();
    json!({ "posts": posts }).to_string()
}

fn bench_decoding(c: &mut Criterion) {
    let mut group = c.benchmark_group("decoding");

    let single = post_json(1).to_string();
    group.bench_function("post/single", |b| {
        b.iter(|| decode::<Post>(black_box(&single)).unwrap())
    });

    for size in [10, 75, 320] {
        let raw = response_json(size);
        group.bench_with_input(BenchmarkId::new("posts_response", size), &raw, |b, raw| {
            b.iter(|| decode::<PostsResponse>(black_box(raw)).unwrap())
        });
    }

    group.finish();
}

fn bench_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("queries");
    let queries = [
        "canid",
        "canid ~felid -gore",
        "rating:s score:>=10 favcount:5..50",
        "-monochrome ~solo ~duo id:<100",
    ];

    for query in queries {
        group.bench_with_input(BenchmarkId::new("parse", query), &query, |b, q| {
            b.iter(|| TagQuery::parse(black_box(q)))
        });
    }

    let posts = decode::<PostsResponse>(&response_json(320)).unwrap().posts;
    for query in queries {
        let parsed = TagQuery::parse(query);
        group.bench_with_input(BenchmarkId::new("matches", query), &parsed, |b, q| {
            b.iter(|| posts.iter().filter(|p| q.matches(black_box(p))).count())
        });
    }

    let blacklist = Blacklist::new(["gore", "scat", "felid rating:e", "young -rating:s"]);
    group.bench_function("blacklist/filter", |b| {
        b.iter_batched(
            || posts.clone(),
            |posts| blacklist.filter(posts, &[]),
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

fn bench_search_options(c: &mut Criterion) {
    let mut group = c.benchmark_group("search_options");

    let options = PostsSearchOptions::builder()
        .all_of("canid")
        .any_of("solo")
        .any_of("duo")
        .none_of("gore")
        .rating(Rating::Safe)
        .rating(Rating::Questionable)
        .order(Order::Score, false)
        .build();

    group.bench_function("compile_to_query", |b| {
        b.iter(|| black_box(&options).compile_to_query())
    });

    group.finish();
}

criterion_group! {
    name = decoding_bench;
    config = Criterion::default()
        .measurement_time(Duration::from_secs(5))
        .sample_size(300);
    targets = bench_decoding
}

criterion_group! {
    name = query_bench;
    config = Criterion::default()
        .measurement_time(Duration::from_secs(3))
        .sample_size(400);
    targets = bench_queries, bench_search_options
}

criterion_main!(decoding_bench, query_bench);
