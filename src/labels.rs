//! Per-segment label storage.
//!
//! A label is an auxiliary integer attribute channel addressed by a small
//! [`LabelId`]. A container declares its label ids once, after its
//! segments are in place; from then on every label holds exactly one
//! value per segment and the container accepts no new segments.
use std::collections::BTreeMap;

use crate::{Error, Result, SegmentId};

pub type LabelId = u8;
pub type LabelValue = i64;

/// No value: e.g. a segment without neighbour on one side.
pub const UNASSIGNED: LabelValue = -1;

/// Not computed by the pass that produced the label.
pub const UNCHECKED: LabelValue = -2;

/// Source layer of a segment: `0` for the first input layer, `1` for the
/// second.
pub const LAYER_LABEL: LabelId = 0;

/// Mapping from label id to one value per segment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Labels {
    types: Vec<LabelId>,
    values: BTreeMap<LabelId, Vec<LabelValue>>,
    len: usize,
    declared: bool,
}

impl Labels {
    /// Declare `types`, each initialised to [`UNASSIGNED`] for `len`
    /// segments.
    pub fn declare(&mut self, types: &[LabelId], len: usize) -> Result<()> {
        if self.is_declared() {
            return Err(Error::LabelsAlreadyDeclared);
        }
        if len == 0 {
            return Err(Error::NoSegments);
        }
        for &label in types {
            if !self.values.contains_key(&label) {
                self.types.push(label);
                self.values.insert(label, vec![UNASSIGNED; len]);
            }
        }
        self.len = len;
        self.declared = true;
        Ok(())
    }

    /// Whether [`Labels::declare`] succeeded, even with no label ids.
    #[inline]
    pub fn is_declared(&self) -> bool {
        self.declared
    }

    /// Declared label ids, in declaration order.
    #[inline]
    pub fn types(&self) -> &[LabelId] {
        &self.types
    }

    #[inline]
    pub fn has(&self, label: LabelId) -> bool {
        self.values.contains_key(&label)
    }

    pub fn column(&self, label: LabelId) -> Result<&[LabelValue]> {
        self.values
            .get(&label)
            .map(Vec::as_slice)
            .ok_or(Error::UnknownLabel(label))
    }

    pub fn get(&self, label: LabelId, id: SegmentId) -> Result<LabelValue> {
        let len = self.len;
        self.column(label)?
            .get(id)
            .copied()
            .ok_or(Error::SegmentOutOfRange { id, len })
    }

    pub fn set(&mut self, label: LabelId, id: SegmentId, value: LabelValue) -> Result<()> {
        let len = self.len;
        let slot = self
            .values
            .get_mut(&label)
            .ok_or(Error::UnknownLabel(label))?
            .get_mut(id)
            .ok_or(Error::SegmentOutOfRange { id, len })?;
        *slot = value;
        Ok(())
    }

    /// Replace the whole column of `label`; `values` must hold one value
    /// per segment.
    pub fn set_column(&mut self, label: LabelId, values: &[LabelValue]) -> Result<()> {
        if values.len() != self.len {
            return Err(Error::LabelCountMismatch {
                expected: self.len,
                found: values.len(),
            });
        }
        self.values
            .get_mut(&label)
            .ok_or(Error::UnknownLabel(label))?
            .copy_from_slice(values);
        Ok(())
    }

    /// Labels of the segments `ids`, in that order.
    pub(crate) fn select<I: IntoIterator<Item = SegmentId>>(&self, ids: I) -> Labels {
        let ids: Vec<_> = ids.into_iter().collect();
        let values = self
            .values
            .iter()
            .map(|(&label, column)| (label, ids.iter().map(|&id| column[id]).collect()))
            .collect();
        Labels {
            types: self.types.clone(),
            values,
            len: if self.declared { ids.len() } else { 0 },
            declared: self.declared,
        }
    }
}

/// Label capability shared by the segment containers.
pub trait Labeled {
    fn labels(&self) -> &Labels;

    fn labels_mut(&mut self) -> &mut Labels;

    /// Number of segments carrying labels.
    fn segments_count(&self) -> usize;

    /// Declare the label ids of this container. Allowed once, and only
    /// when it holds segments.
    fn set_labels_types(&mut self, types: &[LabelId]) -> Result<()> {
        let len = self.segments_count();
        self.labels_mut().declare(types, len)
    }

    fn label_types(&self) -> &[LabelId] {
        self.labels().types()
    }

    fn has_label(&self, label: LabelId) -> bool {
        self.labels().has(label)
    }

    fn get_label_value(&self, label: LabelId, id: SegmentId) -> Result<LabelValue> {
        self.labels().get(label, id)
    }

    fn get_label_values(&self, label: LabelId) -> Result<&[LabelValue]> {
        self.labels().column(label)
    }

    fn set_label_value(&mut self, label: LabelId, id: SegmentId, value: LabelValue) -> Result<()> {
        self.labels_mut().set(label, id, value)
    }

    fn set_label_values(&mut self, label: LabelId, values: &[LabelValue]) -> Result<()> {
        self.labels_mut().set_column(label, values)
    }
}
