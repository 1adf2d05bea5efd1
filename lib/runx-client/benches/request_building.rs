use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use runx_client::catalog::{ENABLE_APP, GET_APP, GET_APPS};
use runx_client::models::EnableState;
use runx_client::request::{build, normalize_server};
use runx_client::{CallParams, ParamSpec, ParamStyle};
use serde_json::json;

fn benchmark_request_building(c: &mut Criterion) {
    let mut group = c.benchmark_group("request_building");
    let server = normalize_server("https://api.runx.dev/v1").expect("valid server");

    group.bench_function("no_parameter", |b| {
        let params = CallParams::default();
        b.iter(|| {
            let request = build(&server, &GET_APPS.descriptor, black_box(&params), None);
            black_box(request)
        });
    });

    group.bench_function("one_path_parameter", |b| {
        let params = CallParams::default().add_param("appId", "my-app");
        b.iter(|| {
            let request = build(&server, &GET_APP.descriptor, black_box(&params), None);
            black_box(request)
        });
    });

    group.bench_function("escaped_path_parameters", |b| {
        let params = CallParams::default()
            .add_param("appId", "team/app name?x=1")
            .add_param("enabled", EnableState::True);
        b.iter(|| {
            let request = build(&server, &ENABLE_APP.descriptor, black_box(&params), None);
            black_box(request)
        });
    });

    group.finish();
}

fn benchmark_param_encoding(c: &mut Criterion) {
    let mut group = c.benchmark_group("param_encoding");

    let cases = [
        ("scalar", ParamSpec::path("appId"), json!("my-app")),
        (
            "array",
            ParamSpec::query("level"),
            json!(["warn", "error", "fatal"]),
        ),
        (
            "matrix",
            ParamSpec::path("ids").with_style(ParamStyle::Matrix),
            json!([1, 2, 3, 4, 5]),
        ),
    ];

    for (name, spec, value) in &cases {
        group.bench_function(*name, |b| {
            b.iter(|| {
                let encoded = spec.encode(black_box(value));
                black_box(encoded)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_request_building, benchmark_param_encoding);
criterion_main!(benches);
