use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use learnhub_auth::{AccessRequirement, Permission, Role, has_all, has_any, permissions_for};

fn bench_permission_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("permissions_for");
    for role in Role::ALL {
        group.bench_with_input(BenchmarkId::from_parameter(role), &role, |b, role| {
            b.iter(|| permissions_for(black_box(*role)))
        });
    }
    group.finish();
}

fn bench_folds(c: &mut Criterion) {
    let requested = [
        Permission::ViewDashboard,
        Permission::ManageUsers,
        Permission::ManageCourses,
        Permission::SecurityAccess,
    ];

    c.bench_function("has_all/admin", |b| {
        b.iter(|| has_all(black_box(Role::Admin), black_box(&requested)))
    });
    c.bench_function("has_any/student", |b| {
        b.iter(|| has_any(black_box(Role::Student), black_box(&requested)))
    });
}

fn bench_requirement(c: &mut Criterion) {
    let requirement = AccessRequirement::all_of(Permission::ALL);
    c.bench_function("requirement/evaluate_denied", |b| {
        b.iter(|| requirement.evaluate(black_box(Role::Instructor)))
    });
}

criterion_group!(benches, bench_permission_lookup, bench_folds, bench_requirement);
criterion_main!(benches);
