mod io;

use std::env;
use std::io::Write;
use std::thread;
use std::time::Duration;

use markov_gen_core::model::error::ModelError;
use markov_gen_core::model::generation::GenerationInput;
use markov_gen_core::model::markov_model::MarkovModel;

fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args: Vec<String> = env::args().collect();
	if args.len() < 2 {
		eprintln!("Usage: {} <corpus.txt> [order] [delay_ms]", args[0]);
		std::process::exit(2);
	}

	let corpus = io::read_file(&args[1])?;
	let order: usize = match args.get(2) {
		Some(value) => value.parse()?,
		None => 2,
	};
	let delay_ms: u64 = match args.get(3) {
		Some(value) => value.parse()?,
		None => 200,
	};

	let mut model = MarkovModel::new(order)?;
	model.fit(&corpus)?;
	println!("Model trained: {} states of {} words", model.state_count(), model.order());

	let input = GenerationInput::default();
	let stdin = std::io::stdin();

	loop {
		print!("Seed word (empty to quit): ");
		std::io::stdout().flush()?;

		let mut line = String::new();
		if stdin.read_line(&mut line)? == 0 {
			break;
		}
		let word = line.trim();
		if word.is_empty() {
			break;
		}

		let mut rng = input.rng();
		let start = match model.choose_seed_state(word, &mut rng) {
			Ok(state) => state,
			Err(ModelError::SeedNotFound(word)) => {
				println!("No state starts with {word:?}, try another word");
				continue;
			}
			Err(e) => return Err(e.into()),
		};

		// Pacing lives here, on the consumer side; the model never sleeps
		for token in model.generate_iter(&start, input.max_len, &mut rng)? {
			match token {
				Ok(token) => {
					print!("{token} ");
					std::io::stdout().flush()?;
					thread::sleep(Duration::from_millis(delay_ms));
				}
				Err(e) => {
					println!();
					println!("Generation stopped: {e}");
					break;
				}
			}
		}
		println!();
	}

	Ok(())
}
