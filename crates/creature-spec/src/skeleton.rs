//! Control skeleton types.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

/// A single bone in the control skeleton.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bone {
    /// Bone name, unique within its skeleton.
    pub name: String,
    /// Parent bone name; empty for a root bone.
    pub parent: String,
    /// Rest position [X, Y, Z] in meters.
    pub position: [f64; 3],
}

impl Bone {
    /// Creates a bone.
    pub fn new(name: impl Into<String>, parent: impl Into<String>, position: [f64; 3]) -> Self {
        Self {
            name: name.into(),
            parent: parent.into(),
            position,
        }
    }

    /// Returns true if this bone has no parent.
    pub fn is_root(&self) -> bool {
        self.parent.trim().is_empty()
    }

    /// Returns the parent name, or `None` for a root bone.
    pub fn parent_name(&self) -> Option<&str> {
        if self.is_root() {
            None
        } else {
            Some(self.parent.as_str())
        }
    }
}

/// Control skeleton for a species blueprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skeleton {
    /// Optional name of the root bone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<String>,
    /// Optional coordinate-system label (e.g. "y-up-right-handed").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinate_system: Option<String>,
    /// Bones in declaration order.
    pub bones: Vec<Bone>,
}

impl Skeleton {
    /// Creates a skeleton from bones.
    pub fn new(bones: Vec<Bone>) -> Self {
        Self {
            root: None,
            coordinate_system: None,
            bones,
        }
    }

    /// Returns the set of bone names.
    pub fn bone_names(&self) -> BTreeSet<&str> {
        self.bones.iter().map(|b| b.name.as_str()).collect()
    }

    /// Looks up a bone by name.
    pub fn bone(&self, name: &str) -> Option<&Bone> {
        self.bones.iter().find(|b| b.name == name)
    }

    /// Returns bone names that occur more than once, in first-seen order.
    pub fn duplicate_bone_names(&self) -> Vec<&str> {
        duplicates(self.bones.iter().map(|b| b.name.as_str()))
    }

    /// Finds every cycle in the parent links.
    ///
    /// Each cycle is listed once, starting from the bone where the walk
    /// re-entered it. Parents that do not name a bone end the walk.
    pub fn parent_cycles(&self) -> Vec<Vec<String>> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            InProgress,
            Done,
        }

        let mut parents: HashMap<&str, Option<&str>> = HashMap::new();
        for bone in &self.bones {
            parents.entry(bone.name.as_str()).or_insert(bone.parent_name());
        }

        let mut marks: HashMap<&str, Mark> = HashMap::new();
        let mut cycles = Vec::new();

        for bone in &self.bones {
            let mut path: Vec<&str> = Vec::new();
            let mut current = Some(bone.name.as_str());

            while let Some(name) = current {
                match marks.get(name) {
                    Some(Mark::Done) => break,
                    Some(Mark::InProgress) => {
                        if let Some(start) = path.iter().position(|n| *n == name) {
                            cycles.push(path[start..].iter().map(|n| n.to_string()).collect());
                        }
                        break;
                    }
                    None => {
                        marks.insert(name, Mark::InProgress);
                        path.push(name);
                        current = parents.get(name).copied().flatten();
                        if let Some(next) = current {
                            if !parents.contains_key(next) {
                                break;
                            }
                        }
                    }
                }
            }

            for name in path {
                marks.insert(name, Mark::Done);
            }
        }

        cycles
    }
}

/// Returns values that occur more than once, each reported once in first-seen order.
pub(crate) fn duplicates<'a>(names: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = BTreeSet::new();
    let mut reported = BTreeSet::new();
    let mut out = Vec::new();
    for name in names {
        if !seen.insert(name) && reported.insert(name) {
            out.push(name);
        }
    }
    out
}
