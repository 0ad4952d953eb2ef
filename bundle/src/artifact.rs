use std::{
    fs, io,
    path::{Path, PathBuf},
};

use log::{debug, info};
use ml_core::{LinearRegression, MlError, OneHotEncoder, RegressionStats, Schema};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::{
    error::{BundleError, Result},
    format,
};

/// How the model inside a bundle was trained.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BundleMetadata {
    /// Rows the model was fitted on.
    pub train_samples: usize,
    /// Rows held out from fitting.
    pub test_samples: usize,
    /// Statistics over the held out rows, if there were any.
    pub holdout: Option<RegressionStats>,
}

/// A fitted encoder and the model trained on its columns, kept together.
///
/// The model weights are only meaningful for the exact encoder that produced
/// the training matrix, so neither can be replaced on its own. Every way of
/// building a bundle checks that both agree with each other and with the schema.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBundle {
    schema: Schema,
    encoder: OneHotEncoder,
    model: LinearRegression,
    metadata: BundleMetadata,
}

#[derive(Serialize)]
struct PayloadRef<'a> {
    encoder_layout: u32,
    schema: &'a Schema,
    encoder: &'a OneHotEncoder,
    model: &'a LinearRegression,
    metadata: &'a BundleMetadata,
}

#[derive(Deserialize)]
struct LayoutTag {
    encoder_layout: u32,
}

#[derive(Deserialize)]
struct Payload {
    schema: Schema,
    encoder: OneHotEncoder,
    model: LinearRegression,
    metadata: BundleMetadata,
}

impl ScoreBundle {
    /// Pairs a fitted encoder with its model.
    ///
    /// # Errors
    /// Returns `BundleError::Inconsistent` if the encoder fields are not the
    /// schema features, the model width is not the encoder width or any part is
    /// invalid on its own.
    pub fn new(
        schema: Schema,
        encoder: OneHotEncoder,
        model: LinearRegression,
        metadata: BundleMetadata,
    ) -> Result<Self> {
        let bundle = Self {
            schema,
            encoder,
            model,
            metadata,
        };
        bundle.validate()?;
        Ok(bundle)
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn encoder(&self) -> &OneHotEncoder {
        &self.encoder
    }

    pub fn model(&self) -> &LinearRegression {
        &self.model
    }

    pub fn metadata(&self) -> &BundleMetadata {
        &self.metadata
    }

    /// Encodes `row` and predicts its score.
    ///
    /// # Errors
    /// Returns an `MlError` if the row has the wrong width or holds a category
    /// the encoder rejects.
    pub fn predict<S: AsRef<str>>(&self, row: &[S]) -> std::result::Result<f64, MlError> {
        let x = self.encoder.transform_row(row)?;
        self.model.predict_one(x.view())
    }

    /// Encodes every row and predicts one score per row.
    ///
    /// # Errors
    /// Same as [`ScoreBundle::predict`], for the first failing row.
    pub fn predict_batch<R, S>(&self, rows: &[R]) -> std::result::Result<Array1<f64>, MlError>
    where
        R: AsRef<[S]>,
        S: AsRef<str>,
    {
        let x = self.encoder.transform(rows)?;
        self.model.predict(x.view())
    }

    /// Serializes the bundle into its framed byte representation.
    ///
    /// # Errors
    /// Returns `BundleError::Payload` if the payload cannot be serialized.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let payload = serde_json::to_vec(&PayloadRef {
            encoder_layout: OneHotEncoder::LAYOUT_VERSION,
            schema: &self.schema,
            encoder: &self.encoder,
            model: &self.model,
            metadata: &self.metadata,
        })?;

        let mut buf = Vec::new();
        format::encode(&payload, &mut buf);
        Ok(buf)
    }

    /// Reads a bundle back from its framed byte representation.
    ///
    /// # Errors
    /// Returns a `BundleError` if the framing is broken, the payload is not a
    /// bundle document, the encoder layout is unsupported or the contents are
    /// inconsistent.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let raw = format::decode(bytes)?;

        // the encoder shape depends on its layout, so the tag goes first
        let tag: LayoutTag = serde_json::from_slice(raw)?;
        if tag.encoder_layout != OneHotEncoder::LAYOUT_VERSION {
            return Err(BundleError::IncompatibleEncoder {
                found: tag.encoder_layout,
                supported: OneHotEncoder::LAYOUT_VERSION,
            });
        }

        let payload: Payload = serde_json::from_slice(raw)?;

        Self::new(
            payload.schema,
            payload.encoder,
            payload.model,
            payload.metadata,
        )
    }

    /// Writes the bundle to `path`.
    ///
    /// The bytes go to a sibling temporary file first, which is then renamed over
    /// `path`, so readers never observe a half written bundle.
    ///
    /// # Errors
    /// Returns `BundleError::Io` if the file cannot be written.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.to_bytes()?;

        let tmp = tmp_path(path);
        if let Err(e) = fs::write(&tmp, &bytes).and_then(|()| fs::rename(&tmp, path)) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }

        info!("bundle saved to {} ({} bytes)", path.display(), bytes.len());
        Ok(())
    }

    /// Loads a bundle from `path`.
    ///
    /// # Errors
    /// Returns `BundleError::Missing` if there is no file at `path`, and any
    /// error of [`ScoreBundle::from_bytes`] otherwise.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => BundleError::Missing(path.to_path_buf()),
            _ => BundleError::Io(e),
        })?;

        let bundle = Self::from_bytes(&bytes)?;
        info!(
            "bundle loaded from {} ({} columns)",
            path.display(),
            bundle.encoder.width()
        );

        Ok(bundle)
    }

    fn validate(&self) -> std::result::Result<(), MlError> {
        self.schema.validate()?;
        self.encoder.validate()?;
        self.model.validate()?;

        if self.encoder.num_fields() != self.schema.width() {
            return Err(MlError::ShapeMismatch {
                what: "encoder fields",
                got: self.encoder.num_fields(),
                expected: self.schema.width(),
            });
        }

        if !self.encoder.field_names().eq(self.schema.features().iter().map(String::as_str)) {
            return Err(MlError::InvalidInput(
                "the encoder fields are not the schema features",
            ));
        }

        if self.model.num_features() != self.encoder.width() {
            return Err(MlError::ShapeMismatch {
                what: "model weights",
                got: self.model.num_features(),
                expected: self.encoder.width(),
            });
        }

        debug!(
            fields = self.encoder.num_fields(),
            columns = self.encoder.width();
            "bundle validated"
        );

        Ok(())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}
