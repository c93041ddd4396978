use std::sync::Arc;
use std::thread;

use hyparticle::prelude::*;

#[test]
fn threads_share_one_reader_and_one_source() {
    let source = BasicSource::new();
    let reader = Arc::new(SharedReader::default());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let source = Arc::clone(&source);
            let reader = Arc::clone(&reader);
            thread::spawn(move || {
                let text = format!("A$x{i}:{{&:P{i}[$x{i}],Q[f($x{i}),$y]}}");
                for _ in 0..50 {
                    let mut input = CharStream::from(text.as_str());
                    let p = reader.read_predicate(&*source, &mut input).unwrap();
                    assert_eq!(p.to_string(), text);
                }
                text
            })
        })
        .collect();

    for handle in handles {
        let text = handle.join().unwrap();
        assert!(parse_predicate(&*source, &text).is_ok());
    }
}

#[test]
fn busy_reader_refuses_try_reads() {
    let source = BasicSource::new();
    let reader = SharedReader::new(StandardReader::with_lexicon(AsciiLexicon));

    let mut input = CharStream::from("f($x) g($y)");
    {
        let mut session = reader.lock();
        let first = session.read_term(&*source, &mut input).unwrap();
        assert_eq!(first.to_string(), "f($x)");

        // The session still holds the reader
        let mut other = CharStream::from("$z");
        assert!(reader.try_read_term(&*source, &mut other).is_none());
        assert!(reader.try_read_predicate(&*source, &mut other).is_none());
    }

    let second = reader.try_read_term(&*source, &mut input).unwrap().unwrap();
    assert_eq!(second.to_string(), "g($y)");
}

#[test]
fn failures_do_not_poison_the_shared_reader() {
    let source = BasicSource::new();
    let reader = SharedReader::default();

    let mut bad = CharStream::from("P[$x");
    assert!(reader.read_predicate(&*source, &mut bad).is_err());
    assert!(!reader.lock().has_pushback());

    let mut good = CharStream::from("'op:->'");
    let p = reader
        .read_particle(&*source, ParticleKind::Operator, &mut good)
        .unwrap();
    assert_eq!(p.kind(), ParticleKind::Operator);
}
