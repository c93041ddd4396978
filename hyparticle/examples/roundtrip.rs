use hyparticle::prelude::*;

fn main() {
    let source = BasicSource::new();

    let text = "A$x:{->:{&:Human[$x],Greek[$x]},E$y:{&:Mortal[$y],=[father($x),$y]}}";
    let formula = match parse_predicate(&*source, text) {
        Ok(formula) => formula,
        Err(err) => {
            eprintln!("{err}");
            return;
        }
    };

    formula.pretty_print().unwrap();
    println!();
    println!("{}", formula.pretty_string_width(24));

    let back = parse_predicate(&*source, &formula.to_string()).unwrap();
    assert_eq!(back, formula);
    println!("{formula}");
}
