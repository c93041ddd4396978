use criterion::{Criterion, black_box, criterion_group, criterion_main};

use hyparticle::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

fn build_simple_predicate(s: &dyn ParticleSource) -> Particle {
    // A$x:{->:Foo[$x],=[$x,$y]}
    let x = s.variable_named("x");
    let y: Particle = s.variable_named("y").into();
    let foo = s
        .atomic_predicate(s.predicate_name("Foo"), vec![x.clone().into()])
        .unwrap();
    let eq = s
        .atomic_predicate(s.predicate_name("="), vec![x.clone().into(), y])
        .unwrap();
    let body = s.predicate_expression(s.operator("->"), vec![foo, eq]).unwrap();
    s.quantified_predicate(s.quantifier("A"), x, body).unwrap()
}

fn build_complex_predicate(s: &dyn ParticleSource) -> Particle {
    // Medium-sized formula, seeded for determinism
    let mut rng = ChaCha20Rng::seed_from_u64(0x42);

    fn next_term(budget: usize, rng: &mut impl Rng, s: &dyn ParticleSource) -> Particle {
        if budget == 0 || rng.random_bool(0.3) {
            let name = format!("v{}", rng.random_range(0..8));
            return s.variable_named(&name).into();
        }
        let arity = rng.random_range(1..=3);
        let args = (0..arity).map(|_| next_term(budget - 1, rng, s)).collect();
        let head = format!("f{}", rng.random_range(0..4));
        s.function_expression(s.function_name(&head), args).unwrap()
    }

    fn next_predicate(budget: usize, rng: &mut impl Rng, s: &dyn ParticleSource) -> Particle {
        if budget == 0 || rng.random_bool(0.2) {
            let arity = rng.random_range(0..=3);
            let args = (0..arity).map(|_| next_term(3, rng, s)).collect();
            let head = format!("P{}", rng.random_range(0..4));
            return s.atomic_predicate(s.predicate_name(&head), args).unwrap();
        }
        match rng.random_range(0..=2) {
            0 => {
                let args = (0..2).map(|_| next_predicate(budget - 1, rng, s)).collect();
                s.predicate_expression(s.operator("&"), args).unwrap()
            }
            1 => {
                let args = (0..2).map(|_| next_predicate(budget - 1, rng, s)).collect();
                s.predicate_expression(s.operator("|"), args).unwrap()
            }
            2 => {
                let name = format!("v{}", rng.random_range(0..8));
                let body = next_predicate(budget - 1, rng, s);
                s.quantified_predicate(s.quantifier("A"), s.variable_named(&name), body)
                    .unwrap()
            }
            _ => unreachable!(),
        }
    }

    next_predicate(8, &mut rng, s)
}

fn bench_write(c: &mut Criterion) {
    let source = BasicSource::new();
    let simple = build_simple_predicate(&*source);
    let complex = build_complex_predicate(&*source);
    let writer = StandardWriter::new();

    c.bench_function("write_simple", |b| {
        b.iter(|| {
            black_box(write_to_string(&writer, &simple).unwrap());
        })
    });

    c.bench_function("write_complex", |b| {
        b.iter(|| {
            black_box(write_to_string(&writer, &complex).unwrap());
        })
    });
}

fn bench_read(c: &mut Criterion) {
    let source = BasicSource::new();
    let simple = build_simple_predicate(&*source).to_string();
    let complex = build_complex_predicate(&*source).to_string();
    let mut reader = StandardReader::new();

    c.bench_function("read_simple", |b| {
        b.iter(|| {
            let mut input = CharStream::from(simple.as_str());
            black_box(reader.read_predicate(&*source, &mut input).unwrap());
        })
    });

    c.bench_function("read_complex", |b| {
        b.iter(|| {
            let mut input = CharStream::from(complex.as_str());
            black_box(reader.read_predicate(&*source, &mut input).unwrap());
        })
    });
}

fn bench_equality(c: &mut Criterion) {
    // Two structurally equal trees with no shared nodes
    let a = build_complex_predicate(&*BasicSource::new());
    let b = build_complex_predicate(&*BasicSource::new());

    c.bench_function("eq_complex", |bench| {
        bench.iter(|| {
            black_box(a == b);
        })
    });
}

criterion_group!(benches, bench_write, bench_read, bench_equality);
criterion_main!(benches);
