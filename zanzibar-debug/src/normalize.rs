use crate::models::*;

/// Level of the synthetic record anchoring the queried permission
pub const ROOT_LEVEL: i32 = 0;

/// Sentinel level of the record naming the queried subject. It is not a
/// graph level and is never matched as an object while tracing a path.
pub const SUBJECT_LEVEL: i32 = -2;

/// Flatten expansion records into the ordered `NodeInfo` sequence.
///
/// The sequence starts with `object#relation -> object` for the queried
/// permission, continues with every record (`parent` becomes `object`,
/// `child` becomes `user`) and ends with the subject sentinel. Duplicates
/// are kept; graph insertion is idempotent.
pub fn normalize(
    object: &str,
    relation: &str,
    subject: &str,
    records: &[ExpansionRecord],
) -> Vec<NodeInfo> {
    let mut nodes = Vec::with_capacity(records.len().saturating_add(2));

    nodes.push(NodeInfo {
        user: TupleKey::new(object, relation).userset_id(),
        object: Some(object.to_string()),
        relation: Some(relation.to_string()),
        color: None,
        level: ROOT_LEVEL,
        seq: 0,
    });

    nodes.extend(records.iter().map(|record| NodeInfo {
        user: record.child.clone(),
        object: Some(record.parent.clone()),
        relation: Some(record.relation.clone()).filter(|r| !r.is_empty()),
        color: None,
        level: record.level,
        seq: record.seq,
    }));

    nodes.push(NodeInfo {
        user: subject.to_string(),
        object: None,
        relation: None,
        color: None,
        level: SUBJECT_LEVEL,
        seq: 0,
    });

    nodes
}
