use markov_gen_core::model::generation::GenerationInput;
use markov_gen_core::model::markov_model::MarkovModel;
use markov_gen_core::model::state::State;

// Small embedded corpus; the final bigram "the mat" also occurs earlier,
// so every reachable state has outgoing transitions.
const CORPUS: &str = "The cat sat on the mat, and the dog sat on the mat. \
	And the cat ran after the dog, and the cat sat on the mat.";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Order-2 model: states are pairs of consecutive words
    let mut model = MarkovModel::new(2)?;

    // Commas, periods and digits are stripped and everything is
    // lower-cased before the transition tables are built
    model.fit(CORPUS)?;

    // Raw transition counts, one state per line, in first-occurrence order
    println!("{model}");

    // A fixed rng seed makes the whole run reproducible
    let input = GenerationInput {
        max_len: 30,
        rng_seed: Some(42),
    };
    let mut rng = input.rng();

    // Resolve a seed word to a starting state, chosen uniformly at random
    // among the states whose first word matches
    let start = model.choose_seed_state("the", &mut rng)?;
    println!("Starting state: {start}");

    // Collect a whole run; the output includes the seed words and is
    // capped at `max_len` tokens
    let words = model.generate(&start, input.max_len, &mut rng)?;
    println!("Generated: {}", words.join(" "));

    // An unknown seed word is a distinct, catchable condition
    match model.choose_seed_state("zebra", &mut rng) {
        Ok(_) => println!("Should not happen"),
        Err(e) => println!("Seed rejected: {e}"),
    }

    // So is a starting state the model never observed
    match model.generate(&State::new(["sat", "zebra"]), input.max_len, &mut rng) {
        Ok(_) => println!("Should not happen"),
        Err(e) => println!("Start rejected: {e}"),
    }

    Ok(())
}
