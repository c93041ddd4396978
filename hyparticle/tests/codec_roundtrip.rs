use hyparticle::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

// Identifiers admitted by the standard lexicon, symbols included
const FUNCTIONS: [&str; 4] = ["f", "g", "succ", "+"];
const PREDICATES: [&str; 4] = ["P", "Q", "=", "≤"];
const OPERATORS: [&str; 4] = ["&", "|", "->", "set"];
const QUANTIFIERS: [&str; 3] = ["A", "E", "∃!"];
const VARIABLES: [&str; 4] = ["x", "y", "z0", "α"];

fn pick<'a>(rng: &mut impl Rng, pool: &[&'a str]) -> &'a str {
    pool[rng.random_range(0..pool.len())]
}

fn random_term(budget: usize, rng: &mut impl Rng, s: &dyn ParticleSource) -> Particle {
    if budget == 0 || rng.random_bool(0.3) {
        return s.variable_named(pick(rng, &VARIABLES)).into();
    }
    match rng.random_range(0..=2) {
        0 => {
            let arity = rng.random_range(0..=3);
            let args = (0..arity).map(|_| random_term(budget - 1, rng, s)).collect();
            s.function_expression(s.function_name(pick(rng, &FUNCTIONS)), args)
                .unwrap()
        }
        1 => {
            let arity = rng.random_range(0..=2);
            let args = (0..arity)
                .map(|_| random_predicate(budget - 1, rng, s))
                .collect();
            s.predicate_comprehension(s.operator(pick(rng, &OPERATORS)), args)
                .unwrap()
        }
        2 => s
            .quantified_term(
                s.quantifier(pick(rng, &QUANTIFIERS)),
                s.variable_named(pick(rng, &VARIABLES)),
                random_predicate(budget - 1, rng, s),
            )
            .unwrap(),
        _ => unreachable!(),
    }
}

fn random_predicate(budget: usize, rng: &mut impl Rng, s: &dyn ParticleSource) -> Particle {
    let leaf = budget == 0 || rng.random_bool(0.3);
    match if leaf { 0 } else { rng.random_range(0..=2) } {
        0 => {
            let arity = rng.random_range(0..=3);
            let args = (0..arity)
                .map(|_| random_term(budget.saturating_sub(1), rng, s))
                .collect();
            s.atomic_predicate(s.predicate_name(pick(rng, &PREDICATES)), args)
                .unwrap()
        }
        1 => {
            let arity = rng.random_range(0..=3);
            let args = (0..arity)
                .map(|_| random_predicate(budget - 1, rng, s))
                .collect();
            s.predicate_expression(s.operator(pick(rng, &OPERATORS)), args)
                .unwrap()
        }
        2 => s
            .quantified_predicate(
                s.quantifier(pick(rng, &QUANTIFIERS)),
                s.variable_named(pick(rng, &VARIABLES)),
                random_predicate(budget - 1, rng, s),
            )
            .unwrap(),
        _ => unreachable!(),
    }
}

#[test]
fn every_kind_survives_write_then_read() {
    let s = BasicSource::new();
    let x = s.variable_named("x");
    let fx = s
        .function_expression(s.function_name("f"), vec![x.clone().into()])
        .unwrap();
    let px = s
        .atomic_predicate(s.predicate_name("P"), vec![fx.clone()])
        .unwrap();
    let comprehension = s
        .predicate_comprehension(s.operator("set"), vec![px.clone()])
        .unwrap();
    let expression = s
        .predicate_expression(s.operator("!"), vec![px.clone()])
        .unwrap();
    let qt = s
        .quantified_term(s.quantifier("ι"), x.clone(), px.clone())
        .unwrap();
    let qp = s
        .quantified_predicate(s.quantifier("A"), x.clone(), expression.clone())
        .unwrap();

    let samples: Vec<Particle> = vec![
        s.variable_name("x").into(),
        s.function_name("f").into(),
        s.predicate_name("P").into(),
        s.operator("->").into(),
        s.quantifier("E").into(),
        x.into(),
        fx,
        px,
        comprehension,
        expression,
        qt,
        qp,
    ];

    for p in samples {
        let text = p.to_string();
        let back = parse_particle(&*s, p.kind(), &text).unwrap();
        assert_eq!(back, p, "{text}");
        assert_eq!(back.kind(), p.kind());
        assert_eq!(back.hash_code(), p.hash_code());
        if p.is_term() {
            assert_eq!(parse_term(&*s, &text).unwrap(), p);
        }
        if p.is_predicate() {
            assert_eq!(parse_predicate(&*s, &text).unwrap(), p);
        }
    }
}

#[test]
fn random_trees_round_trip() {
    let mut rng = ChaCha20Rng::seed_from_u64(0x5eed);
    let s = BasicSource::new();
    for _ in 0..200 {
        let p = if rng.random_bool(0.5) {
            random_term(5, &mut rng, &*s)
        } else {
            random_predicate(5, &mut rng, &*s)
        };
        let text = p.to_string();
        let back = if p.is_term() {
            parse_term(&*s, &text)
        } else {
            parse_predicate(&*s, &text)
        }
        .unwrap_or_else(|err| panic!("{text}: {err}"));
        assert_eq!(back, p, "{text}");
        assert_eq!(back.to_string(), text);

        // Pretty layout only adds whitespace
        let pretty = p.pretty_string_width(16);
        let again = parse_particle(&*s, p.kind(), &pretty)
            .unwrap_or_else(|err| panic!("{pretty}: {err}"));
        assert_eq!(again, p, "{pretty}");
    }
}

#[test]
fn particles_from_different_sources_are_equal() {
    let a = BasicSource::new();
    let b = BasicSource::new();
    let text = "E$y:{&:P[$y],Q[f($y),g()]}:";
    let pa = parse_predicate(&*a, text).unwrap();
    let pb = parse_predicate(&*b, text).unwrap();
    assert_eq!(pa, pb);
    assert!(!pa.origin().same_source(pb.origin()));
}

#[test]
fn written_text_never_reads_back_as_a_different_tree() {
    let s = BasicSource::new();
    let writer = StandardWriter::new();
    let texts = ["x", "", " ", "x y", "x],Q[$y", "a'b", "tab\t", "$", "{", "ok→"];
    for text in texts {
        let candidates: Vec<Particle> = vec![
            s.variable_named(text).into(),
            s.operator(text).into(),
            s.function_expression(s.function_name(text), vec![]).unwrap(),
            s.atomic_predicate(s.predicate_name("P"), vec![s.variable_named(text).into()])
                .unwrap(),
            s.quantified_predicate(
                s.quantifier(text),
                s.variable_named("x"),
                s.atomic_predicate(s.predicate_name("P"), vec![]).unwrap(),
            )
            .unwrap(),
        ];
        for p in candidates {
            // Either the writer refuses, or the text reads back to the same particle
            if let Ok(written) = write_to_string(&writer, &p) {
                let back = parse_particle(&*s, p.kind(), &written).unwrap();
                assert_eq!(back, p, "{written}");
            } else {
                assert!(!StandardLexicon.admits_identifier(text), "{text:?}");
            }
        }
    }
}
