//! Classifier training and prediction commands

use std::fs::File;
use std::path::Path;

use anyhow::{bail, Context, Result};
use spendcat_core::import::{find_column, read_records};
use spendcat_core::{clean_description, TextClassifier};

/// Read (clean text, label) pairs from a labelled CSV
///
/// Uses `clean_description` when present (an export), otherwise cleans
/// `description`. Rows with an empty label are skipped.
pub fn read_training_data(file: &Path) -> Result<(Vec<String>, Vec<String>)> {
    let reader =
        File::open(file).with_context(|| format!("Failed to open {}", file.display()))?;
    let (headers, records) = read_records(reader)?;

    let label_col = find_column(&headers, "category")
        .context("Training data needs a 'category' column")?;
    let (text_col, already_clean) = match find_column(&headers, "clean_description") {
        Some(col) => (col, true),
        None => (
            find_column(&headers, "description")
                .context("Training data needs a 'description' column")?,
            false,
        ),
    };

    let mut texts = Vec::with_capacity(records.len());
    let mut labels = Vec::with_capacity(records.len());
    for record in &records {
        let label = record.get(label_col).unwrap_or("").trim();
        if label.is_empty() {
            continue;
        }
        let text = record.get(text_col).unwrap_or("");
        texts.push(if already_clean {
            text.to_string()
        } else {
            clean_description(text)
        });
        labels.push(label.to_string());
    }

    if texts.is_empty() {
        bail!("No labelled rows in {}", file.display());
    }
    Ok((texts, labels))
}

pub fn cmd_model_train(file: &Path, output: &Path) -> Result<()> {
    let (texts, labels) = read_training_data(file)?;

    let mut model = TextClassifier::new();
    model.fit(&texts, &labels).context("Training failed")?;
    model
        .save(output)
        .with_context(|| format!("Failed to write model to {}", output.display()))?;

    println!();
    println!("✅ Trained on {} rows", texts.len());
    println!("   Features: {}", model.n_features());
    println!("   Classes:  {}", model.classes().join(", "));
    println!("   Saved to {}", output.display());

    Ok(())
}

pub fn cmd_model_predict(model: &Path, descriptions: &[String]) -> Result<()> {
    let model = super::load_model(model)?;

    let cleaned: Vec<String> = descriptions.iter().map(|d| clean_description(d)).collect();
    let predictions = model.predict(&cleaned)?;

    for (description, category) in descriptions.iter().zip(predictions) {
        println!("{} -> {}", description, category);
    }

    Ok(())
}
