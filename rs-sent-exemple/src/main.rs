use rs_sent_core::ModelConfig;
use rs_sent_core::model::{BagOfWords, SentimentModel};
use rs_sent_core::store::{LabeledExample, split_holdout};
use rs_sent_core::text::normalize;

/// Film reviews with a score between -100 (awful) and 100 (masterpiece)
const TRAIN_DATA: &[(&str, f64)] = &[
    ("helt klart århundradets bästa film", 95.0),
    ("en film i absolut världsklass", 90.0),
    ("det här är årets bästa film alla kategorier", 85.0),
    ("så jävla bra", 83.0),
    ("jag är övertygad om att om 20 år kommer alla säga att detta är en klassiker", 80.0),
    ("en jättebra film helt enkelt", 78.0),
    ("en mycket bra film", 75.0),
    ("den var riktigt bra måste jag säga", 75.0),
    ("jättebra film skulle vilja se fler av samma regisör", 75.0),
    ("en riktigt bra film", 70.0),
    ("perfekt för en mysig hemmakväll", 65.0),
    ("den var förvånande nog ganska bra ändå", 60.0),
    ("den här filmen var helt okej tycker jag", 50.0),
    ("jag skulle gärna se fler såna här filmer", 40.0),
    ("jag tyckte väl att den var ganska bra", 30.0),
    ("den duger en regning kväll", 25.0),
    ("godkänd men inte mer än så skulle jag säga", 20.0),
    ("knappt godkänd men har sina poänger", 15.0),
    ("den kunde ha varit värre", 10.0),
    ("inte den bästa jag sett men inte det sämsta heller", 0.0),
    ("vad ska man säga det var inget man vill se igen direkt", -15.0),
    ("en småtråkig film måste jag säga", -10.0),
    ("den var tråkig vill inte se den igen", -20.0),
    ("mycket tråkig film tycker jag", -30.0),
    ("den var jättetråkig", -30.0),
    ("den var ganska dålig faktiskt", -30.0),
    ("det här var inget mästerverk direkt", -35.0),
    ("en riktigt dålig film", -50.0),
    ("rent skräp finns inget annat att säga", -65.0),
    ("hur sopig som helst", -70.0),
    ("den här filmen suger helt enkelt", -75.0),
    ("fattar inte hur en film kan vara så dålig", -75.0),
    ("filmen suger stenhårt", -80.0),
    ("det var 90 minuter av mitt liv jag aldrig kommer att få tillbaka", -80.0),
    ("detta var rent skräp finns inget annat att säga", -80.0),
    ("en riktig jävla skitfilm", -85.0),
    ("den var riktigt jävla sämst", -87.0),
    ("århundradets sämsta film alla kategorier", -90.0),
    ("det är den sämsta film jag någonsin sett", -90.0),
    ("aldrig har mänligheten utsatts för värre smörja en detta", -95.0),
];

/// Unseen sentences to score
const TEST_DATA: &[&str] = &[
    "Århundradets bästa film, enligt min mening!",
    "det här är min nya favoritfilm",
    "jag tyckte den var jättebra",
    "en ganska bra film",
    "vill gärna se den igen någon gång",
    "den var väl okej",
    "den var skitdålig",
    "sämsta jag har sett på länge",
    "århundradets skitfilm alla kategorier",
    "skräp helt enkelt",
];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Set RUST_LOG=debug to see every matched n-gram
    env_logger::init();

    let examples: Vec<LabeledExample> = TRAIN_DATA
        .iter()
        .map(|(text, score)| LabeledExample { text: text.to_string(), score: *score })
        .collect();

    // Unigrams up to trigrams; trigram matches weigh three times a unigram match
    let config = ModelConfig { min_n: 1, max_n: 3, ..ModelConfig::default() };
    println!("min_n: {}, max_n: {}", config.min_n, config.max_n);

    let mut model = SentimentModel::new(&config)?;
    model.train_examples(&examples)?;

    // Test sentences must be normalized (and lowercased) the same way as training data
    for sentence in TEST_DATA {
        let sentence = normalize(sentence).trim_end_matches('.').to_lowercase();
        println!("Value for '{}': {}", sentence, model.predict(&sentence)? as i64);
    }

    // Holdout evaluation: train on 80%, score the remaining 20%
    let (train, test) = split_holdout(&examples, 0.2, 42);
    let mut holdout_model = SentimentModel::new(&config)?;
    holdout_model.train_examples(&train)?;

    let mut total_error = 0.0;
    for example in &test {
        let predicted = holdout_model.predict(&example.text)?;
        println!("  {:>6.1} (expected {:>5.1}): {}", predicted, example.score, example.text);
        total_error += (predicted - example.score).abs();
    }
    println!("Holdout mean absolute error: {:.1} over {} sentences", total_error / test.len() as f64, test.len());

    // Most frequent words of the training corpus
    let mut bag = BagOfWords::new();
    for example in &examples {
        bag.add(example.text.split(' '));
    }
    println!("{} distinct words, most frequent:", bag.len());
    for (word, count) in bag.sorted_by_frequency(true).into_iter().take(10) {
        println!("  {} {}", word, count);
    }

    Ok(())
}
