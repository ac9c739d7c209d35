//! docqa-embed
//!
//! Local `EmbeddingProvider` implementations: the BGE-M3 model run through
//! candle, and a hashing embedder for tests and offline development.

use anyhow::{Result, anyhow};
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::time::Instant;

use candle_core::{Device, DType, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::xlm_roberta::{XLMRobertaModel, Config as XLMRobertaConfig};
use tokenizers::Tokenizer;
use twox_hash::XxHash64;

use docqa_core::config::EmbeddingSettings;
use docqa_core::traits::EmbeddingProvider;

mod device;
mod pool;
mod tokenize;

pub use device::select_device;
pub use pool::masked_mean_l2;
pub use tokenize::tokenize_on_device;

pub const BGE_M3_DIM: usize = 1024;
const MAX_TOKENS: usize = 256;

pub struct BgeM3Embedder { model: XLMRobertaModel, tokenizer: Tokenizer, device: Device }

impl BgeM3Embedder {
    pub fn load(model_dir: &Path) -> Result<Self> {
        let device = select_device();
        tracing::info!(dir = %model_dir.display(), "🔄 Loading BGE-M3 model");
        let tokenizer_path = model_dir.join("tokenizer.json");
        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow!("Failed to load tokenizer from {}: {}", tokenizer_path.display(), e))?;
        let config_path = model_dir.join("config.json");
        let config: XLMRobertaConfig = serde_json::from_str(&std::fs::read_to_string(&config_path)?)?;
        let weights_path = model_dir.join("pytorch_model.bin");
        let weights = candle_core::pickle::read_all(&weights_path)?;
        let weights_map: std::collections::HashMap<String, Tensor> = weights.into_iter().collect();
        let vb = VarBuilder::from_tensors(weights_map, DType::F32, &device);
        let model = XLMRobertaModel::new(&config, vb)?;
        tracing::info!("✅ BGE-M3 model loaded");
        Ok(Self { model, tokenizer, device })
    }

    pub fn embed_text(&self, text: &str) -> Result<Vec<f32>> {
        let start = Instant::now();
        let (input_ids, attention_mask) = tokenize_on_device(&self.tokenizer, text, MAX_TOKENS, &self.device)?;
        let token_type_ids = Tensor::zeros((1, MAX_TOKENS), DType::I64, &self.device)?;
        let hidden = self.model.forward(&input_ids, &attention_mask, &token_type_ids, None, None, None)?;
        let pooled = masked_mean_l2(&hidden, &attention_mask)?;
        let emb: Vec<f32> = pooled.to_device(&Device::Cpu)?.squeeze(0)?.to_vec1()?;
        if emb.len() != BGE_M3_DIM {
            return Err(anyhow!("expected {} dimensions, model produced {}", BGE_M3_DIM, emb.len()));
        }
        if start.elapsed().as_millis() > 100 { tracing::debug!(ms = start.elapsed().as_millis() as u64, "⚠️  Slow embedding"); }
        Ok(emb)
    }
}

impl EmbeddingProvider for BgeM3Embedder {
    fn dim(&self) -> usize { BGE_M3_DIM }
    fn embed_many(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> { texts.iter().map(|t| self.embed_text(t)).collect() }
}

/// Deterministic bag-of-words embedder: each lowercase alphanumeric token is
/// hashed into one bucket, and the vector is L2-normalized.
pub struct HashingEmbedder { dim: usize }

impl HashingEmbedder {
    pub fn new(dim: usize) -> Self { Self { dim: dim.max(1) } }

    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0f32; self.dim];
        let lower = text.to_lowercase();
        for token in lower.split(|c: char| !c.is_alphanumeric()).filter(|t| !t.is_empty()) {
            let mut hasher = XxHash64::with_seed(0);
            token.hash(&mut hasher);
            let h = hasher.finish();
            let idx = (h as usize) % self.dim;
            v[idx] += 0.5 + (((h >> 32) as u32) as f32) / (u32::MAX as f32);
        }
        let norm = (v.iter().map(|x| x * x).sum::<f32>()).sqrt().max(1e-6);
        for x in &mut v { *x /= norm; }
        v
    }
}

impl EmbeddingProvider for HashingEmbedder {
    fn dim(&self) -> usize { self.dim }
    fn embed_many(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> { Ok(texts.iter().map(|t| self.embed_text(t)).collect()) }
}

fn fake_requested_by_env() -> bool {
    std::env::var("APP_USE_FAKE_EMBEDDINGS").ok().map(|v| v == "1" || v.eq_ignore_ascii_case("true")).unwrap_or(false)
}

/// Picks the hashing embedder when `embedding.use_fake` or
/// `APP_USE_FAKE_EMBEDDINGS=1` is set, otherwise loads BGE-M3.
pub fn get_default_embedder(settings: &EmbeddingSettings) -> Result<Box<dyn EmbeddingProvider>> {
    if settings.use_fake || fake_requested_by_env() {
        tracing::info!(dim = settings.dim, "🧪 Using HashingEmbedder");
        return Ok(Box::new(HashingEmbedder::new(settings.dim)));
    }
    let model_dir = resolve_model_dir(settings.model_dir.as_deref())?;
    Ok(Box::new(BgeM3Embedder::load(&model_dir)?))
}

fn resolve_model_dir(configured: Option<&str>) -> Result<PathBuf> {
    if let Some(dir) = configured { let p = docqa_core::config::expand_path(dir); if p.exists() { return Ok(p); } tracing::warn!(dir = %p.display(), "configured model dir does not exist"); }
    if let Ok(dir) = std::env::var("APP_MODEL_DIR") { let p = PathBuf::from(&dir); if p.exists() { tracing::info!("📦 Using APP_MODEL_DIR: {}", p.display()); return Ok(p); } }
    if let Ok(dir) = std::env::var("MODEL_DIR") { let p = PathBuf::from(&dir); if p.exists() { tracing::info!("📦 Using MODEL_DIR: {}", p.display()); return Ok(p); } }
    let local = Path::new("models/bge-m3"); if local.exists() { return Ok(local.to_path_buf()); }
    Err(anyhow!("Could not locate BGE-M3 model directory"))
}
