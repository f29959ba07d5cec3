use std::io;
use std::path::Path;

use tokenizers::models::wordpiece::WordPiece;
use tokenizers::normalizers::BertNormalizer;
use tokenizers::pre_tokenizers::bert::BertPreTokenizer;
use tokenizers::processors::bert::BertProcessing;
use tokenizers::{Tokenizer, TruncationParams};

const CLS_TOKEN: &str = "[CLS]";
const SEP_TOKEN: &str = "[SEP]";
const UNK_TOKEN: &str = "[UNK]";

/// Loads a serialized `tokenizer.json`.
pub fn load_tokenizer(tokenizer_path: &Path) -> io::Result<Tokenizer> {
    Tokenizer::from_file(tokenizer_path).map_err(io::Error::other)
}

/// Builds a BERT WordPiece tokenizer from a bare `vocab.txt`.
///
/// Accents are never stripped: NFD-decomposing Hangul would split syllables
/// into jamo that are missing from Korean vocabularies.
pub fn build_wordpiece_tokenizer(vocab_path: &Path, lowercase: bool) -> io::Result<Tokenizer> {
    let vocab = vocab_path.to_str().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("vocab path is not valid UTF-8: {}", vocab_path.display()),
        )
    })?;

    let wordpiece = WordPiece::from_file(vocab)
        .unk_token(UNK_TOKEN.to_string())
        .build()
        .map_err(|e| io::Error::other(format!("Failed to read vocab: {}", e)))?;

    let mut tokenizer = Tokenizer::new(wordpiece);

    let cls_id = special_token_id(&tokenizer, CLS_TOKEN)?;
    let sep_id = special_token_id(&tokenizer, SEP_TOKEN)?;

    tokenizer
        .with_normalizer(Some(BertNormalizer::new(true, true, Some(false), lowercase)))
        .with_pre_tokenizer(Some(BertPreTokenizer))
        .with_post_processor(Some(BertProcessing::new(
            (SEP_TOKEN.to_string(), sep_id),
            (CLS_TOKEN.to_string(), cls_id),
        )));

    Ok(tokenizer)
}

fn special_token_id(tokenizer: &Tokenizer, token: &str) -> io::Result<u32> {
    tokenizer.token_to_id(token).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("vocab is missing special token {}", token),
        )
    })
}

/// Enables truncation so long inputs fit the model's position embeddings.
pub fn with_truncation(mut tokenizer: Tokenizer, max_len: usize) -> io::Result<Tokenizer> {
    let truncation = TruncationParams {
        max_length: max_len,
        ..Default::default()
    };

    tokenizer
        .with_truncation(Some(truncation))
        .map_err(|e| io::Error::other(format!("Failed to configure truncation: {}", e)))?;
    tokenizer.with_padding(None);

    Ok(tokenizer)
}
