use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use actix_cors::Cors;
use actix_web::{get, post, put, web, App, HttpResponse, HttpServer, Responder};
use log::{error, info, warn};

use rs_sent_core::model::{BagOfWords, SentimentModel};
use rs_sent_core::store::{LabeledExample, RecordStore, load_examples};
use rs_sent_core::stream::{Message, Pipeline};
use rs_sent_core::{Config, ModelConfig, SentError, SentResult};
use serde::Deserialize;

/// Configuration file used when `RS_SENT_CONFIG` is not set.
const DEFAULT_CONFIG_PATH: &str = "./rs-sent.toml";

/// `[server]` section of the configuration file.
#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
struct ServerConfig {
	host: String,
	port: u16,
	data_dir: PathBuf,
}

impl Default for ServerConfig {
	fn default() -> Self {
		Self { host: "127.0.0.1".to_owned(), port: 5000, data_dir: PathBuf::from("./data") }
	}
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct ServerFile {
	server: ServerConfig,
}

/// Query parameters for `/v1/predict`
#[derive(Deserialize)]
struct PredictParams {
	sentence: Option<String>,
}

/// Query parameters for `/v1/train`
#[derive(Deserialize)]
struct TrainParams {
	sentence: Option<String>,
	score: Option<f64>,
}

#[derive(Deserialize)]
struct TargetParams {
	value: Option<f64>,
}

#[derive(Deserialize)]
struct FrequencyParams {
	limit: Option<usize>,
}

/// Everything a request may touch, behind one lock.
///
/// The model is trained and queried from several workers, so every access
/// goes through the `Mutex` wrapping this struct.
struct SharedData {
	model_config: ModelConfig,
	/// Prepared seed examples followed by the ones trained over HTTP.
	examples: Vec<LabeledExample>,
	model: SentimentModel,
	store: RecordStore,
	pipeline: Pipeline,
	bag: BagOfWords,
}

impl SharedData {
	/// Prepares the seed examples and builds the first model.
	fn new(model_config: ModelConfig, seed_examples: Vec<LabeledExample>, store: RecordStore, pipeline: Pipeline) -> SentResult<Self> {
		let mut bag = BagOfWords::new();
		for record in store.records() {
			bag.add(record.post_text.split(' '));
		}

		let examples = prepare_examples(&seed_examples);
		if examples.len() != seed_examples.len() {
			info!("Prepared {} seed examples into {} sentences", seed_examples.len(), examples.len());
		}

		let model = build_model(&model_config, &examples, &store)?;
		Ok(Self { model_config, examples, model, store, pipeline, bag })
	}

	/// Trains every sentence of `text` and keeps them for later retrains.
	///
	/// Returns the cleaned sentences.
	fn train(&mut self, text: &str, score: f64) -> SentResult<Vec<String>> {
		let sentences: Vec<String> = Pipeline::prepare(text).into_iter().map(|(_, cleaned)| cleaned).collect();
		for sentence in &sentences {
			self.model.train(sentence, score)?;
			self.examples.push(LabeledExample { text: sentence.clone(), score });
		}
		Ok(sentences)
	}

	/// Mean score of the sentences of `text`, or `None` if it has none.
	fn predict(&self, text: &str) -> SentResult<Option<f64>> {
		let prepared = Pipeline::prepare(text);
		if prepared.is_empty() {
			return Ok(None);
		}

		let mut total = 0.0;
		for (_, sentence) in &prepared {
			total += self.model.predict(sentence)?;
		}
		Ok(Some(total / prepared.len() as f64))
	}

	/// Rebuilds the model from the kept examples and every labeled record.
	fn retrain(&mut self) -> SentResult<usize> {
		self.model = build_model(&self.model_config, &self.examples, &self.store)?;
		Ok(self.examples.len() + self.store.labeled().count())
	}
}

/// Cleans example texts the way requests are cleaned, one example per sentence.
fn prepare_examples(examples: &[LabeledExample]) -> Vec<LabeledExample> {
	examples
		.iter()
		.flat_map(|example| {
			Pipeline::prepare(&example.text)
				.into_iter()
				.map(move |(_, text)| LabeledExample { text, score: example.score })
		})
		.collect()
}

/// Builds a model from prepared examples and the labeled records.
///
/// Record texts are already cleaned by the pipeline.
fn build_model(config: &ModelConfig, examples: &[LabeledExample], store: &RecordStore) -> SentResult<SentimentModel> {
	let mut examples = examples.to_vec();
	examples.extend(store.labeled());

	let mut model = SentimentModel::new(config)?;
	model.train_examples(&examples)?;
	Ok(model)
}

fn error_response(e: SentError) -> HttpResponse {
	match e {
		SentError::UnknownRecord(_) => HttpResponse::NotFound().body(e.to_string()),
		SentError::InvalidToken | SentError::Parse { .. } => HttpResponse::BadRequest().body(e.to_string()),
		_ => {
			error!("Request failed: {}", e);
			HttpResponse::InternalServerError().body(e.to_string())
		}
	}
}

/// HTTP GET endpoint `/v1/predict`
///
/// Scores a sentence with the current model.
#[get("/v1/predict")]
async fn get_prediction(data: web::Data<Mutex<SharedData>>, query: web::Query<PredictParams>) -> impl Responder {
	let Some(sentence) = &query.sentence else {
		return HttpResponse::BadRequest().body("Missing sentence");
	};

	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	match shared_data.predict(sentence) {
		Ok(Some(value)) => HttpResponse::Ok().body(value.to_string()),
		Ok(None) => HttpResponse::BadRequest().body("Empty sentence"),
		Err(e) => error_response(e),
	}
}

/// HTTP PUT endpoint `/v1/train`
///
/// Adds every sentence of the text to the model with the same score.
#[put("/v1/train")]
async fn put_training(data: web::Data<Mutex<SharedData>>, query: web::Query<TrainParams>) -> impl Responder {
	let (Some(sentence), Some(score)) = (&query.sentence, query.score) else {
		return HttpResponse::BadRequest().body("Missing sentence or score");
	};

	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	match shared_data.train(sentence, score) {
		Ok(sentences) if sentences.is_empty() => HttpResponse::BadRequest().body("Empty sentence"),
		Ok(sentences) => HttpResponse::Ok().body(format!("Trained '{}' with {}", sentences.join(". "), score)),
		Err(e) => error_response(e),
	}
}

/// HTTP POST endpoint `/v1/messages`
///
/// Runs one message through the pipeline, records its sentences and
/// returns them with their scores as JSON.
#[post("/v1/messages")]
async fn post_message(data: web::Data<Mutex<SharedData>>, message: web::Json<Message>) -> impl Responder {
	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	let SharedData { model, store, pipeline, bag, .. } = &mut *shared_data;

	let scored = match pipeline.process(model, store, &message) {
		Ok(scored) => scored,
		Err(e) => return error_response(e),
	};
	for sentence in &scored {
		bag.add(sentence.post_text.split(' '));
	}
	if let Err(e) = store.flush() {
		warn!("Failed to flush records: {}", e);
	}

	HttpResponse::Ok().json(scored)
}

/// HTTP PUT endpoint `/v1/records/{id}/target`
///
/// Labels a recorded sentence so the next retrain learns from it.
#[put("/v1/records/{id}/target")]
async fn put_target(data: web::Data<Mutex<SharedData>>, path: web::Path<u64>, query: web::Query<TargetParams>) -> impl Responder {
	let Some(value) = query.value else {
		return HttpResponse::BadRequest().body("Missing value");
	};
	let id = path.into_inner();

	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	if let Err(e) = shared_data.store.set_target(id, value) {
		return error_response(e);
	}
	if let Err(e) = shared_data.store.flush() {
		warn!("Failed to flush records: {}", e);
	}
	HttpResponse::Ok().body(format!("Record {} labeled {}", id, value))
}

#[put("/v1/retrain")]
async fn put_retrain(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	match shared_data.retrain() {
		Ok(count) => HttpResponse::Ok().body(format!("Model rebuilt from {} examples", count)),
		Err(e) => error_response(e),
	}
}

#[get("/v1/stats")]
async fn get_stats(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	let matrix = shared_data.model.matrix();
	let lines: Vec<String> = (matrix.min_n()..=matrix.max_n()).map(|n| format!("n={}: {} ngrams", n, matrix.len(n))).collect();
	HttpResponse::Ok().body(lines.join("\n"))
}

#[get("/v1/frequencies")]
async fn get_frequencies(data: web::Data<Mutex<SharedData>>, query: web::Query<FrequencyParams>) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	let limit = query.limit.unwrap_or(20);
	let lines: Vec<String> = shared_data
		.bag
		.sorted_by_frequency(true)
		.into_iter()
		.take(limit)
		.map(|(word, count)| format!("{} {}", word, count))
		.collect();
	HttpResponse::Ok().body(lines.join("\n"))
}

/// Loads the configuration, the seed examples and the record store.
fn load_shared_data(config_path: &Path) -> Result<(ServerConfig, SharedData), Box<dyn std::error::Error>> {
	let config = Config::load_or_default(config_path)?;
	let server: ServerConfig = match fs::read_to_string(config_path) {
		Ok(text) => toml::from_str::<ServerFile>(&text)?.server,
		Err(_) => ServerConfig::default(),
	};

	let train_path = server.data_dir.join("train.dat");
	let seed_examples = if train_path.exists() || server.data_dir.join("train.bin").exists() {
		load_examples(&train_path)?
	} else {
		warn!("No training data at {}, starting with an empty model", train_path.display());
		Vec::new()
	};

	let store = RecordStore::open(server.data_dir.join("records.bin"))?;
	let search_term = config.stream.search_terms.first().cloned().unwrap_or_default();
	let shared_data = SharedData::new(config.model, seed_examples, store, Pipeline::new(&search_term))?;

	Ok((server, shared_data))
}

/// Main entry point for the server.
///
/// Loads the configuration and training data, builds the model, wraps it
/// in a `Mutex` and starts an Actix-web HTTP server.
///
/// # Notes
/// - The configuration path comes from `RS_SENT_CONFIG` (default `./rs-sent.toml`).
/// - Logging is controlled by `RUST_LOG`.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::init();

	let config_path = env::var("RS_SENT_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_owned());
	let (server, shared_data) = load_shared_data(Path::new(&config_path)).map_err(|e| std::io::Error::other(e.to_string()))?;
	let shared_model = web::Data::new(Mutex::new(shared_data));

	info!("Listening on {}:{}", server.host, server.port);
	HttpServer::new(move || {
		App::new()
			.wrap(Cors::default().allow_any_origin().allowed_methods(vec!["GET", "PUT", "POST"]).allow_any_header())
			.app_data(shared_model.clone())
			.service(get_prediction)
			.service(put_training)
			.service(post_message)
			.service(put_target)
			.service(put_retrain)
			.service(get_stats)
			.service(get_frequencies)
	})
		.bind((server.host.as_str(), server.port))?
		.run()
		.await
}
