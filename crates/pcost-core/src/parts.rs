//! Closed sum types for the parts a batch is cut into.
//!
//! Only [`JointProductCode`] values can enter a market-value allocation. The
//! wider [`PartCode`] union covers everything else the plant produces; turning
//! one into a joint code is the single place the scope rail is checked for
//! string input.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{CostError, ErrorInfo};

/// The three allocable joint products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JointProductCode {
    /// Breast cap (breast with bone, before filleting).
    BreastCap,
    /// Whole legs.
    Legs,
    /// Whole wings.
    Wings,
}

impl JointProductCode {
    /// Every joint product code, in canonical order.
    pub const ALL: [JointProductCode; 3] = [
        JointProductCode::BreastCap,
        JointProductCode::Legs,
        JointProductCode::Wings,
    ];

    /// Stable snake_case identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            JointProductCode::BreastCap => "breast_cap",
            JointProductCode::Legs => "legs",
            JointProductCode::Wings => "wings",
        }
    }

    /// Sub-cuts that may be carved out of this joint product.
    pub fn sub_cuts(self) -> &'static [SubCutCode] {
        match self {
            JointProductCode::BreastCap => &[SubCutCode::Fillet, SubCutCode::InnerFillet],
            JointProductCode::Legs => &[
                SubCutCode::Thigh,
                SubCutCode::Drumstick,
                SubCutCode::ThighFillet,
            ],
            JointProductCode::Wings => &[
                SubCutCode::Drumette,
                SubCutCode::WingMiddle,
                SubCutCode::WingTip,
            ],
        }
    }
}

/// Non-allocable outputs credited at a flat rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ByProductType {
    /// Collected blood.
    Blood,
    /// Feathers.
    Feathers,
    /// Heads.
    Heads,
    /// Feet and paws.
    Feet,
    /// Edible offal (hearts, livers, gizzards).
    Offal,
    /// Back and carcass frame left after cutting.
    BackCarcass,
    /// Necks.
    Neck,
    /// Abdominal fat.
    Fat,
    /// Category 3 animal by-product waste.
    Cat3Waste,
}

impl ByProductType {
    const ALL: [ByProductType; 9] = [
        ByProductType::Blood,
        ByProductType::Feathers,
        ByProductType::Heads,
        ByProductType::Feet,
        ByProductType::Offal,
        ByProductType::BackCarcass,
        ByProductType::Neck,
        ByProductType::Fat,
        ByProductType::Cat3Waste,
    ];

    /// Stable snake_case identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            ByProductType::Blood => "blood",
            ByProductType::Feathers => "feathers",
            ByProductType::Heads => "heads",
            ByProductType::Feet => "feet",
            ByProductType::Offal => "offal",
            ByProductType::BackCarcass => "back_carcass",
            ByProductType::Neck => "neck",
            ByProductType::Fat => "fat",
            ByProductType::Cat3Waste => "cat3_waste",
        }
    }
}

/// Named cuts produced from a single joint product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubCutCode {
    /// Breast fillet.
    Fillet,
    /// Inner fillet (tenderloin).
    InnerFillet,
    /// Bone-in thigh.
    Thigh,
    /// Drumstick.
    Drumstick,
    /// Deboned thigh meat.
    ThighFillet,
    /// Wing drumette.
    Drumette,
    /// Wing middle joint.
    WingMiddle,
    /// Wing tip.
    WingTip,
}

impl SubCutCode {
    const ALL: [SubCutCode; 8] = [
        SubCutCode::Fillet,
        SubCutCode::InnerFillet,
        SubCutCode::Thigh,
        SubCutCode::Drumstick,
        SubCutCode::ThighFillet,
        SubCutCode::Drumette,
        SubCutCode::WingMiddle,
        SubCutCode::WingTip,
    ];

    /// Joint product this cut is carved from.
    pub fn parent(self) -> JointProductCode {
        match self {
            SubCutCode::Fillet | SubCutCode::InnerFillet => JointProductCode::BreastCap,
            SubCutCode::Thigh | SubCutCode::Drumstick | SubCutCode::ThighFillet => {
                JointProductCode::Legs
            }
            SubCutCode::Drumette | SubCutCode::WingMiddle | SubCutCode::WingTip => {
                JointProductCode::Wings
            }
        }
    }

    /// Stable snake_case identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            SubCutCode::Fillet => "fillet",
            SubCutCode::InnerFillet => "inner_fillet",
            SubCutCode::Thigh => "thigh",
            SubCutCode::Drumstick => "drumstick",
            SubCutCode::ThighFillet => "thigh_fillet",
            SubCutCode::Drumette => "drumette",
            SubCutCode::WingMiddle => "wing_middle",
            SubCutCode::WingTip => "wing_tip",
        }
    }
}

/// Any part code known to the plant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PartCode {
    /// An allocable joint product.
    Joint(JointProductCode),
    /// A flat-credited by-product.
    ByProduct(ByProductType),
    /// A cut carved from a joint product.
    SubCut(SubCutCode),
}

impl PartCode {
    /// Stable snake_case identifier; namespaces never overlap.
    pub fn as_str(self) -> &'static str {
        match self {
            PartCode::Joint(code) => code.as_str(),
            PartCode::ByProduct(kind) => kind.as_str(),
            PartCode::SubCut(cut) => cut.as_str(),
        }
    }

    /// Namespace label used in diagnostics.
    pub fn namespace(self) -> &'static str {
        match self {
            PartCode::Joint(_) => "joint",
            PartCode::ByProduct(_) => "by_product",
            PartCode::SubCut(_) => "sub_cut",
        }
    }

    /// Looks up a code across all namespaces.
    pub fn lookup(text: &str) -> Option<PartCode> {
        let text = text.trim();
        JointProductCode::ALL
            .iter()
            .find(|code| code.as_str() == text)
            .map(|code| PartCode::Joint(*code))
            .or_else(|| {
                ByProductType::ALL
                    .iter()
                    .find(|kind| kind.as_str() == text)
                    .map(|kind| PartCode::ByProduct(*kind))
            })
            .or_else(|| {
                SubCutCode::ALL
                    .iter()
                    .find(|cut| cut.as_str() == text)
                    .map(|cut| PartCode::SubCut(*cut))
            })
    }
}

impl FromStr for PartCode {
    type Err = CostError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        PartCode::lookup(text).ok_or_else(|| {
            CostError::InvalidInput(
                ErrorInfo::new("unknown-part-code", "part code is not known to the plant")
                    .with_context("part_code", text),
            )
        })
    }
}

impl TryFrom<String> for PartCode {
    type Error = CostError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PartCode> for String {
    fn from(value: PartCode) -> Self {
        value.as_str().to_string()
    }
}

impl From<JointProductCode> for PartCode {
    fn from(value: JointProductCode) -> Self {
        PartCode::Joint(value)
    }
}

impl From<SubCutCode> for PartCode {
    fn from(value: SubCutCode) -> Self {
        PartCode::SubCut(value)
    }
}

impl From<ByProductType> for PartCode {
    fn from(value: ByProductType) -> Self {
        PartCode::ByProduct(value)
    }
}

impl TryFrom<PartCode> for JointProductCode {
    type Error = CostError;

    fn try_from(value: PartCode) -> Result<Self, Self::Error> {
        match value {
            PartCode::Joint(code) => Ok(code),
            other => Err(CostError::ScopeViolation(
                ErrorInfo::new(
                    "not-allocable",
                    "only breast_cap, legs and wings may enter a joint cost allocation",
                )
                .with_context("part_code", other.as_str())
                .with_context("namespace", other.namespace()),
            )),
        }
    }
}

impl FromStr for JointProductCode {
    type Err = CostError;

    /// Parses an allocable code. Anything else, including codes that are valid
    /// elsewhere in the plant, is a scope violation.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match PartCode::lookup(text) {
            Some(part) => JointProductCode::try_from(part),
            None => Err(CostError::ScopeViolation(
                ErrorInfo::new("unknown-joint-code", "code is outside the allocable set")
                    .with_context("part_code", text),
            )),
        }
    }
}

impl FromStr for SubCutCode {
    type Err = CostError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match PartCode::lookup(text) {
            Some(PartCode::SubCut(cut)) => Ok(cut),
            _ => Err(CostError::ScopeViolation(
                ErrorInfo::new("not-a-sub-cut", "code is not a known sub-cut")
                    .with_context("part_code", text),
            )),
        }
    }
}

impl fmt::Display for JointProductCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for SubCutCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ByProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for PartCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Explicit target of an activity-based cost driver.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostObjectRef {
    /// Cost incurred on a physical part.
    Part(PartCode),
    /// Cost incurred on a finished SKU.
    Sku(String),
}

impl fmt::Display for CostObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CostObjectRef::Part(part) => write!(f, "part:{part}"),
            CostObjectRef::Sku(code) => write!(f, "sku:{code}"),
        }
    }
}
