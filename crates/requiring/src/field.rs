//! Field identity
//!
//! A rule names its field by pointing at it inside a template record. The
//! pointer is turned into a byte offset from the template's base address and
//! matched exactly, together with the field's type, against the record's
//! visible fields. The match yields a [`FieldPath`] that relocates the same
//! field in any other instance through [`Record::field_at`].
//!
//! Addresses are only compared, never dereferenced.

use std::any::{Any, TypeId};
use std::fmt;
use std::mem;

/// A struct whose fields can be named by reference
///
/// Usually derived with `#[derive(Record)]`. Fields marked
/// `#[record(flatten)]` must be records themselves; their fields are promoted
/// into the outer record's visible fields.
pub trait Record: Default + Any {
    /// Every field, followed by the promoted fields of flattened ones
    fn visible_fields() -> Vec<FieldDescriptor>;

    /// The field at `path`, or the record itself for the empty path
    fn field_at(&self, path: &[usize]) -> Option<&dyn Any>;
}

/// Index sequence leading from a record to one of its (possibly promoted) fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldPath(Vec<usize>);

impl FieldPath {
    /// The record itself
    pub fn root() -> Self {
        FieldPath(Vec::new())
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    fn prepend(mut self, index: usize) -> Self {
        self.0.insert(0, index);
        self
    }
}

impl From<Vec<usize>> for FieldPath {
    fn from(indices: Vec<usize>) -> Self {
        FieldPath(indices)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            return f.write_str("<record>");
        }
        for (i, index) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", index)?;
        }
        Ok(())
    }
}

/// One visible field of a record type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    name: String,
    path: FieldPath,
    offset: usize,
    size: usize,
    type_id: TypeId,
    type_name: &'static str,
}

impl FieldDescriptor {
    /// Field of type `F` at position `index`, `offset` bytes into its record
    pub fn of<F: Any>(name: &str, index: usize, offset: usize) -> Self {
        Self {
            name: name.to_string(),
            path: FieldPath(vec![index]),
            offset,
            size: mem::size_of::<F>(),
            type_id: TypeId::of::<F>(),
            type_name: std::any::type_name::<F>(),
        }
    }

    /// The record `T` itself
    pub fn root<T: Any>() -> Self {
        Self {
            name: String::new(),
            path: FieldPath::root(),
            offset: 0,
            size: mem::size_of::<T>(),
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Re-anchor a field of an embedded record onto the outer record
    pub fn promoted(self, outer_name: &str, outer_index: usize, outer_offset: usize) -> Self {
        Self {
            name: format!("{}.{}", outer_name, self.name),
            path: self.path.prepend(outer_index),
            offset: outer_offset + self.offset,
            ..self
        }
    }

    /// Dotted field name, empty for the record itself
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    /// Byte offset from the start of the record
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

/// Why a field reference could not be resolved
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("field reference does not point into the `{record}` template")]
    OutsideTemplate { record: &'static str },

    #[error(
        "no field of type `{type_name}` starts at offset {offset} of `{record}` \
         (fields of embedded records need #[record(flatten)])"
    )]
    NoSuchField {
        record: &'static str,
        type_name: &'static str,
        offset: usize,
    },

    #[error("{count} fields of type `{type_name}` start at offset {offset} of `{record}`")]
    Ambiguous {
        record: &'static str,
        type_name: &'static str,
        offset: usize,
        count: usize,
    },
}

/// Identify the field of `template` that `field` points at
pub fn resolve<T: Record, F: Any>(template: &T, field: &F) -> Result<FieldDescriptor, FieldError> {
    let record = std::any::type_name::<T>();
    let base = template as *const T as usize;
    let address = field as *const F as usize;

    let offset = match address.checked_sub(base) {
        Some(offset) if offset + mem::size_of::<F>() <= mem::size_of::<T>() => offset,
        _ => return Err(FieldError::OutsideTemplate { record }),
    };

    if offset == 0 && TypeId::of::<F>() == TypeId::of::<T>() {
        return Ok(FieldDescriptor::root::<T>());
    }

    let mut candidates: Vec<FieldDescriptor> = T::visible_fields()
        .into_iter()
        .filter(|f| f.offset == offset && f.type_id == TypeId::of::<F>())
        .collect();

    match candidates.len() {
        1 => Ok(candidates.remove(0)),
        0 => Err(FieldError::NoSuchField {
            record,
            type_name: std::any::type_name::<F>(),
            offset,
        }),
        count => Err(FieldError::Ambiguous {
            record,
            type_name: std::any::type_name::<F>(),
            offset,
            count,
        }),
    }
}

#[cfg(all(test, feature = "derive"))]
mod tests {
    use super::*;
    use crate::Record;
    use pretty_assertions::assert_eq;
    use std::marker::PhantomData;

    #[derive(Debug, Default, Record)]
    struct Audit {
        created_by: String,
        revision: u32,
    }

    #[derive(Debug, Default, Record)]
    struct Document {
        title: String,
        #[record(flatten)]
        audit: Audit,
        tags: Vec<String>,
    }

    #[derive(Debug, Default, Record)]
    struct Pair(u8, u64);

    #[derive(Debug, Default, Record)]
    struct Labeled<T> {
        label: String,
        inner: T,
    }

    #[derive(Debug, Default, Record)]
    #[repr(C)]
    struct Markers {
        first: PhantomData<u8>,
        second: PhantomData<u8>,
        id: u32,
    }

    #[test]
    fn test_visible_fields_include_promoted() {
        let names: Vec<String> = Document::visible_fields()
            .iter()
            .map(|f| f.name().to_string())
            .collect();
        assert_eq!(
            names,
            vec!["title", "audit", "audit.created_by", "audit.revision", "tags"]
        );
    }

    #[test]
    fn test_resolve_direct_field() {
        let doc = Document::default();
        let field = resolve(&doc, &doc.title).unwrap();
        assert_eq!(field.name(), "title");
        assert_eq!(field.path().indices(), &[0]);
        assert_eq!(field.type_id(), TypeId::of::<String>());
    }

    #[test]
    fn test_resolve_promoted_field() {
        let doc = Document::default();
        let field = resolve(&doc, &doc.audit.revision).unwrap();
        assert_eq!(field.name(), "audit.revision");
        assert_eq!(field.path().indices(), &[1, 1]);
        assert_eq!(
            field.offset(),
            mem::offset_of!(Document, audit) + mem::offset_of!(Audit, revision)
        );
    }

    #[test]
    fn test_embedded_record_and_first_field_share_offset() {
        let doc = Document::default();
        let whole = resolve(&doc, &doc.audit).unwrap();
        let first = resolve(&doc, &doc.audit.created_by).unwrap();
        assert_eq!(whole.offset(), first.offset());
        assert_eq!(whole.name(), "audit");
        assert_eq!(first.name(), "audit.created_by");
    }

    #[test]
    fn test_resolve_record_itself() {
        let doc = Document::default();
        let root = resolve(&doc, &doc).unwrap();
        assert!(root.path().is_root());
        assert_eq!(root.path().to_string(), "<record>");
    }

    #[test]
    fn test_resolve_tuple_struct() {
        let pair = Pair::default();
        assert_eq!(resolve(&pair, &pair.1).unwrap().name(), "1");
        assert_eq!(resolve(&pair, &pair.0).unwrap().name(), "0");
    }

    #[test]
    fn test_reference_outside_template_is_rejected() {
        let doc = Document::default();
        let other = Document::default();
        assert!(matches!(
            resolve(&doc, &other.title),
            Err(FieldError::OutsideTemplate { .. })
        ));
        let title = String::new();
        assert!(matches!(
            resolve(&doc, &title),
            Err(FieldError::OutsideTemplate { .. })
        ));
    }

    #[test]
    fn test_wrong_type_at_field_offset_is_rejected() {
        let pair = Pair::default();
        // First byte of the u64 field, viewed as a u8.
        let byte = unsafe { &*(&pair.1 as *const u64 as *const u8) };
        assert!(matches!(
            resolve(&pair, byte),
            Err(FieldError::NoSuchField { .. })
        ));
    }

    #[test]
    fn test_generic_record() {
        let labeled = Labeled::<u32>::default();
        let field = resolve(&labeled, &labeled.inner).unwrap();
        assert_eq!(field.name(), "inner");
        assert_eq!(field.type_id(), TypeId::of::<u32>());

        let labeled = Labeled {
            label: "count".to_string(),
            inner: 3u32,
        };
        let inner = labeled
            .field_at(field.path().indices())
            .and_then(|v| v.downcast_ref::<u32>())
            .copied();
        assert_eq!(inner, Some(3));
    }

    #[test]
    fn test_same_type_at_same_offset_is_ambiguous() {
        let markers = Markers::default();
        assert_eq!(
            resolve(&markers, &markers.second),
            Err(FieldError::Ambiguous {
                record: std::any::type_name::<Markers>(),
                type_name: std::any::type_name::<PhantomData<u8>>(),
                offset: 0,
                count: 2,
            })
        );
        assert_eq!(resolve(&markers, &markers.id).unwrap().name(), "id");
    }

    #[test]
    fn test_copy_of_field_is_rejected() {
        let doc = Document::default();
        let revision = doc.audit.revision;
        assert!(matches!(
            resolve(&doc, &revision),
            Err(FieldError::OutsideTemplate { .. })
        ));
    }

    #[test]
    fn test_field_at_relocates_by_path() {
        let doc = Document {
            title: "Quarterly".to_string(),
            audit: Audit {
                created_by: "ops".to_string(),
                revision: 7,
            },
            tags: vec![],
        };
        let revision = doc
            .field_at(&[1, 1])
            .and_then(|v| v.downcast_ref::<u32>())
            .copied();
        assert_eq!(revision, Some(7));
        assert!(doc.field_at(&[9]).is_none());
        assert!(doc.field_at(&[0, 0]).is_none());
    }
}
