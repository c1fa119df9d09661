use poem_chain_core::model::chain::Chain;
use poem_chain_core::model::sampler::Sampler;

// A handful of lines in the role of the training corpus. A real caller
// would read these from a file or a CSV column and run its own cleanup
// before tokenizing.
const CORPUS: &str = "\
the fog comes on little cat feet
it sits looking over harbor and city
on silent haunches and then moves on
the fog sits over the city
little cat feet over the harbor
and then the fog moves on";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Tokenize by whitespace; the library only ever sees word sequences
    let sentences: Vec<Vec<String>> = CORPUS
        .lines()
        .map(|line| line.split_whitespace().map(str::to_owned).collect())
        .collect();

    // Build the chain twice: sequentially, and chunked over all CPUs.
    // Counts are summed commutatively, so both builds are identical.
    let chain = Chain::from_sentences(&sentences);
    let parallel_chain = Chain::from_sentences_parallel(&sentences)?;
    assert_eq!(chain, parallel_chain);
    println!("Trained chain with {} states", chain.len());

    let sampler = Sampler::new(&chain);

    // Create a generation input with default parameters
    let mut input = sampler.make_generation_input();

    // Number of retries when a walk comes back empty
    input.nb_try = 100;

    // Maximum number of transitions per walk (0 would disable the cap)
    input.max_steps = 1000;

    // Generate 10 lines, one independent walk each
    for (i, words) in sampler.generate(&input, 10)?.iter().enumerate() {
        println!("Generated line {}: {}", i + 1, words.join(" "));
    }

    // The same batch, distributed over all CPUs; the chain is read-only
    // during generation so the walks need no coordination
    let batch = sampler.generate_parallel(&input, 4)?;
    println!("Parallel batch of {} lines generated", batch.len());

    // A corpus where a word is only ever followed by itself can never
    // reach a terminal state; the step cap reports it instead of hanging
    let looping_chain = Chain::from_sentences(&[vec![
        "la".to_owned(),
        "la".to_owned(),
        "la".to_owned(),
    ]]);
    let looping_sampler = Sampler::new(&looping_chain);
    let mut looping_input = looping_sampler.make_generation_input();
    looping_input.max_steps = 50;
    match looping_sampler.generate(&looping_input, 1) {
        Ok(_) => println!("Should not happen"),
        Err(e) => println!("Looping corpus rejected as expected: {}", e),
    }

    Ok(())
}
