//! The bucket log of a canvas
//!
//! Draw requests land in named buckets, in call order. At render time the
//! buckets are flushed in declaration order: the built-in `grid`, `axes` and
//! `default`, then the buckets the user declared. Merged buckets are flushed
//! together, as one section placed where their first-declared constituent
//! would be.

use super::types::EntryId;

pub const GRID: &str = "grid";
pub const AXES: &str = "axes";
pub const DEFAULT: &str = "default";

#[derive(Debug, Clone)]
struct Bucket {
    name: String,
    entries: Vec<EntryId>,
}

#[derive(Debug, Clone)]
struct Merge {
    into: String,
    /// Constituents in the order given to `merge`
    members: Vec<String>,
}

/// One section of the flushed log.
#[derive(Debug, Clone, PartialEq)]
pub enum Section<'a> {
    Single {
        name: &'a str,
        entries: &'a [EntryId],
    },
    Merged {
        name: &'a str,
        parts: Vec<(&'a str, &'a [EntryId])>,
    },
}

#[derive(Debug, Clone)]
pub struct SeparatorList {
    buckets: Vec<Bucket>,
    merges: Vec<Merge>,
}

impl Default for SeparatorList {
    fn default() -> Self {
        let mut list = SeparatorList {
            buckets: Vec::new(),
            merges: Vec::new(),
        };
        for name in [GRID, AXES, DEFAULT] {
            list.declare(name);
        }
        list
    }
}

impl SeparatorList {
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.buckets.iter().position(|b| b.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Add a bucket after every existing one. Declaring twice is a no-op.
    pub fn declare(&mut self, name: &str) {
        if !self.contains(name) {
            self.buckets.push(Bucket {
                name: name.to_string(),
                entries: Vec::new(),
            });
        }
    }

    /// Append `entry` to `bucket`. Returns `false` for an unknown bucket.
    pub fn push(&mut self, bucket: &str, entry: EntryId) -> bool {
        match self.position(bucket) {
            Some(i) => {
                self.buckets[i].entries.push(entry);
                true
            }
            None => false,
        }
    }

    pub fn entries(&self, bucket: &str) -> Option<&[EntryId]> {
        self.position(bucket).map(|i| self.buckets[i].entries.as_slice())
    }

    pub fn is_merged(&self, bucket: &str) -> bool {
        self.merges.iter().any(|m| m.members.iter().any(|n| n == bucket))
    }

    /// Fuse `members` into one section named `into`.
    ///
    /// The caller checks that every member exists and is not merged yet.
    pub(crate) fn merge(&mut self, members: &[&str], into: &str) {
        self.merges.push(Merge {
            into: into.to_string(),
            members: members.iter().map(|m| m.to_string()).collect(),
        });
    }

    /// Sections in flush order.
    pub fn sections(&self) -> Vec<Section<'_>> {
        let mut sections = Vec::new();
        for bucket in &self.buckets {
            let merge = self
                .merges
                .iter()
                .find(|m| m.members.iter().any(|n| *n == bucket.name));
            match merge {
                None => sections.push(Section::Single {
                    name: &bucket.name,
                    entries: &bucket.entries,
                }),
                Some(merge) => {
                    let first = merge
                        .members
                        .iter()
                        .filter_map(|n| self.position(n))
                        .min();
                    if first != self.position(&bucket.name) {
                        continue;
                    }
                    let parts = merge
                        .members
                        .iter()
                        .filter_map(|n| {
                            self.position(n)
                                .map(|i| (self.buckets[i].name.as_str(), self.buckets[i].entries.as_slice()))
                        })
                        .collect();
                    sections.push(Section::Merged {
                        name: &merge.into,
                        parts,
                    });
                }
            }
        }
        sections
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &SeparatorList) -> Vec<String> {
        list.sections()
            .iter()
            .map(|s| match s {
                Section::Single { name, .. } => name.to_string(),
                Section::Merged { name, parts } => {
                    let members: Vec<&str> = parts.iter().map(|(n, _)| *n).collect();
                    format!("{name}[{}]", members.join(","))
                }
            })
            .collect()
    }

    #[test]
    fn builtin_order() {
        let list = SeparatorList::new();
        assert_eq!(names(&list), vec!["grid", "axes", "default"]);
    }

    #[test]
    fn declared_buckets_follow_default() {
        let mut list = SeparatorList::new();
        list.declare("labels");
        list.declare("grid");
        assert_eq!(names(&list), vec!["grid", "axes", "default", "labels"]);
    }

    #[test]
    fn push_keeps_call_order() {
        let mut list = SeparatorList::new();
        assert!(list.push(DEFAULT, EntryId(2)));
        assert!(list.push(DEFAULT, EntryId(0)));
        assert!(!list.push("nowhere", EntryId(1)));
        assert_eq!(list.entries(DEFAULT), Some(&[EntryId(2), EntryId(0)][..]));
    }

    #[test]
    fn merged_section_sits_at_first_constituent() {
        let mut list = SeparatorList::new();
        list.declare("labels");
        list.merge(&["labels", "grid"], "background");
        assert_eq!(names(&list), vec!["background[labels,grid]", "axes", "default"]);
        assert!(list.is_merged("grid"));
        assert!(!list.is_merged("axes"));
    }
}
