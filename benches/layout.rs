use criterion::{black_box, criterion_group, criterion_main, Criterion};
use miyawaki_planner::{compute_layout, PlantingMethod, PlotSpecification, SoilType, UnitType};

fn bench_compute_layout(c: &mut Criterion) {
    let spec = PlotSpecification {
        plot_size: 1076.4,
        unit_type: UnitType::Feet,
        planting_method: PlantingMethod::Terrace,
        soil_type: SoilType::Loam,
        selected_species: vec!["quercus-robur".to_string(), "cornus-sanguinea".to_string()],
        aspect_ratio: 1.5,
    };

    c.bench_function("compute_layout", |b| {
        b.iter(|| compute_layout(black_box(&spec)))
    });
}

criterion_group!(benches, bench_compute_layout);
criterion_main!(benches);
