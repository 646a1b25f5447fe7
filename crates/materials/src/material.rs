use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use partsapp_core::{DomainError, DomainResult, MaterialId};

/// One materials order logged for a body technician.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Material {
    pub id: MaterialId,
    pub body_technician: String,
    pub part_number: String,
    pub description: String,
    pub ordered_qty: i64,
    pub ordered_date: Option<DateTime<Utc>>,
    pub unit_type: String,
    pub received_qty: i64,
    pub received_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Request to log a new material order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMaterial {
    #[serde(default)]
    pub body_technician: String,
    pub part_number: String,
    pub description: String,
    #[serde(default)]
    pub ordered_qty: i64,
    #[serde(default)]
    pub ordered_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub unit_type: String,
    #[serde(default)]
    pub received_qty: i64,
    #[serde(default)]
    pub received_date: Option<DateTime<Utc>>,
}

fn ensure_quantity(name: &str, qty: i64) -> DomainResult<()> {
    if qty < 0 {
        return Err(DomainError::validation(format!("{name} cannot be negative")));
    }
    Ok(())
}

impl NewMaterial {
    pub fn validate(&self) -> DomainResult<()> {
        if self.part_number.trim().is_empty() {
            return Err(DomainError::validation("part_number is required"));
        }
        if self.description.trim().is_empty() {
            return Err(DomainError::validation("description is required"));
        }
        ensure_quantity("ordered_qty", self.ordered_qty)?;
        ensure_quantity("received_qty", self.received_qty)?;
        Ok(())
    }

    pub fn into_material(self, id: MaterialId, now: DateTime<Utc>) -> DomainResult<Material> {
        self.validate()?;
        Ok(Material {
            id,
            body_technician: self.body_technician.trim().to_string(),
            part_number: self.part_number.trim().to_string(),
            description: self.description.trim().to_string(),
            ordered_qty: self.ordered_qty,
            ordered_date: self.ordered_date,
            unit_type: self.unit_type.trim().to_string(),
            received_qty: self.received_qty,
            received_date: self.received_date,
            created_at: now,
        })
    }
}

/// Admin edit of a material. Only provided, non-blank fields change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialPatch {
    #[serde(default)]
    pub body_technician: Option<String>,
    #[serde(default)]
    pub part_number: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub ordered_qty: Option<i64>,
    #[serde(default)]
    pub ordered_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub unit_type: Option<String>,
    #[serde(default)]
    pub received_qty: Option<i64>,
    #[serde(default)]
    pub received_date: Option<DateTime<Utc>>,
}

fn set_text(target: &mut String, value: &Option<String>) {
    if let Some(v) = value {
        let v = v.trim();
        if !v.is_empty() {
            *target = v.to_string();
        }
    }
}

impl Material {
    pub fn apply_patch(&mut self, patch: &MaterialPatch) -> DomainResult<()> {
        if let Some(q) = patch.ordered_qty {
            ensure_quantity("ordered_qty", q)?;
        }
        if let Some(q) = patch.received_qty {
            ensure_quantity("received_qty", q)?;
        }

        set_text(&mut self.body_technician, &patch.body_technician);
        set_text(&mut self.part_number, &patch.part_number);
        set_text(&mut self.description, &patch.description);
        set_text(&mut self.unit_type, &patch.unit_type);
        if let Some(q) = patch.ordered_qty {
            self.ordered_qty = q;
        }
        if let Some(q) = patch.received_qty {
            self.received_qty = q;
        }
        if patch.ordered_date.is_some() {
            self.ordered_date = patch.ordered_date;
        }
        if patch.received_date.is_some() {
            self.received_date = patch.received_date;
        }
        Ok(())
    }
}

/// List query for the materials log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialFilter {
    #[serde(default)]
    pub technician: Option<String>,
}

impl MaterialFilter {
    pub fn matches(&self, material: &Material) -> bool {
        match self.technician.as_deref().map(str::trim) {
            Some(t) if !t.is_empty() => material.body_technician == t,
            _ => true,
        }
    }

    /// Filter and order newest first.
    pub fn apply(&self, materials: Vec<Material>) -> Vec<Material> {
        let mut out: Vec<Material> = materials.into_iter().filter(|m| self.matches(m)).collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        out
    }
}
