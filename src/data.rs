use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

pub const FIREARMS_FILE: &str = "Firearms.txt";
pub const BULLETS_FILE: &str = "Bullet.txt";
pub const COEFFICIENTS_FILE: &str = "Ballistic Coefficients.txt";

/// Fatal at startup; the offending table cannot be loaded.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("{file}: {detail}")]
    Format { file: &'static str, detail: String },
}

/// Recoverable; a simulate request referenced a record that does not exist.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("Firearm not found!")]
    FirearmNotFound,
    #[error("Bullet not found!")]
    BulletNotFound,
    #[error("Ballistic coefficient not found!")]
    CoefficientNotFound,
}

#[derive(Debug, Deserialize)]
struct FirearmRow {
    #[serde(rename = "Firearm_ID")]
    firearm_id: String,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Muzzle_Velocity")]
    muzzle_velocity: String,
}

// First column is a per-row entry id the simulator never uses; rows are
// keyed by the owning firearm instead.
#[derive(Debug, Deserialize)]
struct BulletRow {
    #[serde(rename = "Firearm_ID")]
    firearm_id: String,
    #[serde(rename = "Bullet_ID")]
    bullet_id: String,
    #[serde(rename = "Caliber")]
    caliber: String,
    #[serde(rename = "Weight_Grains")]
    weight_grains: String,
    #[serde(rename = "Bullet_Type")]
    bullet_type: String,
}

#[derive(Debug, Deserialize)]
struct CoefficientRow {
    #[serde(rename = "Bullet_ID")]
    bullet_id: String,
    #[serde(rename = "Estimated_BC")]
    estimated_bc: String,
}

#[derive(Debug, Clone)]
pub struct Firearm {
    pub id: String,
    pub name: String,
    /// Numeric part of the `Muzzle_Velocity` field, parsed once at load.
    pub muzzle_velocity_mps: f64,
    /// Raw field text including the unit, kept for display.
    pub muzzle_velocity_label: String,
}

#[derive(Debug, Clone)]
pub struct Bullet {
    pub bullet_id: String,
    pub caliber: String,
    pub weight_grains: f64,
    pub bullet_type: String,
}

/// A pipe-delimited table: header row of field names, one record per line.
fn read_rows<T, R>(file: &'static str, source: R) -> Result<Vec<T>, TableError>
where
    T: serde::de::DeserializeOwned,
    R: Read,
{
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b'|')
        .trim(csv::Trim::All)
        .from_reader(source);

    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        let row: T = result.map_err(|e| TableError::Format {
            file,
            detail: e.to_string(),
        })?;
        rows.push(row);
    }
    Ok(rows)
}

fn parse_positive(file: &'static str, field: &str, raw: &str) -> Result<f64, TableError> {
    let value: f64 = raw.parse().map_err(|_| TableError::Format {
        file,
        detail: format!("{field} is not a number: {raw:?}"),
    })?;
    if !(value > 0.0) {
        return Err(TableError::Format {
            file,
            detail: format!("{field} must be positive: {raw:?}"),
        });
    }
    Ok(value)
}

/// One record per firearm id; a duplicated id keeps the later row.
pub fn load_firearms<R: Read>(source: R) -> Result<BTreeMap<String, Firearm>, TableError> {
    let mut firearms = BTreeMap::new();
    for row in read_rows::<FirearmRow, _>(FIREARMS_FILE, source)? {
        // field format is "<number> <unit>", e.g. "823 m/s"
        let speed = row.muzzle_velocity.split(' ').next().unwrap_or("");
        let muzzle_velocity_mps = parse_positive(FIREARMS_FILE, "Muzzle_Velocity", speed)?;
        firearms.insert(
            row.firearm_id.clone(),
            Firearm {
                id: row.firearm_id,
                name: row.name,
                muzzle_velocity_mps,
                muzzle_velocity_label: row.muzzle_velocity,
            },
        );
    }
    Ok(firearms)
}

/// Bullet rows are grouped into ordered lists under the owning firearm id,
/// preserving file order within each group.
pub fn load_bullets<R: Read>(source: R) -> Result<BTreeMap<String, Vec<Bullet>>, TableError> {
    let mut bullets: BTreeMap<String, Vec<Bullet>> = BTreeMap::new();
    for row in read_rows::<BulletRow, _>(BULLETS_FILE, source)? {
        let weight_grains = parse_positive(BULLETS_FILE, "Weight_Grains", &row.weight_grains)?;
        bullets.entry(row.firearm_id).or_default().push(Bullet {
            bullet_id: row.bullet_id,
            caliber: row.caliber,
            weight_grains,
            bullet_type: row.bullet_type,
        });
    }
    Ok(bullets)
}

pub fn load_coefficients<R: Read>(source: R) -> Result<BTreeMap<String, f64>, TableError> {
    let mut coefficients = BTreeMap::new();
    for row in read_rows::<CoefficientRow, _>(COEFFICIENTS_FILE, source)? {
        let bc = parse_positive(COEFFICIENTS_FILE, "Estimated_BC", &row.estimated_bc)?;
        coefficients.insert(row.bullet_id, bc);
    }
    Ok(coefficients)
}

/// The record-side inputs of the accuracy formula; wind speed and distance
/// come from the form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotInputs {
    pub muzzle_velocity: f64,
    pub weight_grains: f64,
    pub ballistic_coefficient: f64,
}

/// The three lookup tables, loaded once at startup and read-only afterwards.
#[derive(Debug, Default)]
pub struct ArsenalData {
    pub firearms: BTreeMap<String, Firearm>,
    pub bullets: BTreeMap<String, Vec<Bullet>>,
    pub coefficients: BTreeMap<String, f64>,
}

impl ArsenalData {
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let open = |name: &'static str| {
            File::open(dir.join(name)).with_context(|| format!("opening {name}"))
        };

        let firearms = load_firearms(open(FIREARMS_FILE)?)?;
        let bullets = load_bullets(open(BULLETS_FILE)?)?;
        let coefficients = load_coefficients(open(COEFFICIENTS_FILE)?)?;

        log::info!(
            "loaded {} firearms, {} bullet associations, {} coefficients",
            firearms.len(),
            bullets.values().map(Vec::len).sum::<usize>(),
            coefficients.len()
        );

        Ok(Self {
            firearms,
            bullets,
            coefficients,
        })
    }

    pub fn bullets_for(&self, firearm_id: &str) -> &[Bullet] {
        self.bullets
            .get(firearm_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Resolves a (firearm, bullet) selection against all three tables. The
    /// bullet must be listed under the queried firearm; the same bullet id
    /// under a different firearm does not match.
    pub fn shot_inputs(&self, firearm_id: &str, bullet_id: &str) -> Result<ShotInputs, LookupError> {
        let firearm = self
            .firearms
            .get(firearm_id)
            .ok_or(LookupError::FirearmNotFound)?;
        let bullet = self
            .bullets_for(firearm_id)
            .iter()
            .find(|b| b.bullet_id == bullet_id)
            .ok_or(LookupError::BulletNotFound)?;
        let ballistic_coefficient = *self
            .coefficients
            .get(bullet_id)
            .ok_or(LookupError::CoefficientNotFound)?;

        Ok(ShotInputs {
            muzzle_velocity: firearm.muzzle_velocity_mps,
            weight_grains: bullet.weight_grains,
            ballistic_coefficient,
        })
    }
}
