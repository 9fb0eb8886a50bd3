use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator between the object and the relation of a userset id
pub const USERSET_SEPARATOR: char = '#';

/// Object/relation pair sent to the expansion service
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TupleKey {
    pub object: String,
    pub relation: String,
}

impl TupleKey {
    pub fn new(object: &str, relation: &str) -> Self {
        Self {
            object: object.to_string(),
            relation: relation.to_string(),
        }
    }

    /// The `object#relation` id this key names
    pub fn userset_id(&self) -> String {
        format!("{}{}{}", self.object, USERSET_SEPARATOR, self.relation)
    }
}

impl fmt::Display for TupleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.object, USERSET_SEPARATOR, self.relation)
    }
}

/// Body of `POST /stores/{store_id}/expand`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpandRequest {
    pub tuple_key: TupleKey,
}

/// Successful expansion payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpandResponse {
    pub tree: Tree,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tree {
    pub root: RewriteTree,
}

/// One node of the rewrite tree returned by the expansion service.
///
/// `union` and `leaf` are mutually exclusive on a well-formed node. Node
/// kinds this debugger does not interpret (intersection, difference) are
/// ignored during deserialisation and produce no records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RewriteTree {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub union: Option<UnionNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leaf: Option<Leaf>,
}

impl RewriteTree {
    pub fn leaf(name: &str, leaf: Leaf) -> Self {
        Self {
            name: name.to_string(),
            union: None,
            leaf: Some(leaf),
        }
    }

    pub fn union(name: &str, nodes: Vec<RewriteTree>) -> Self {
        Self {
            name: name.to_string(),
            union: Some(UnionNode { nodes }),
            leaf: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnionNode {
    #[serde(default)]
    pub nodes: Vec<RewriteTree>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Leaf {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub users: Option<Users>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub computed: Option<Computed>,
    #[serde(
        default,
        rename = "tupleToUserset",
        skip_serializing_if = "Option::is_none"
    )]
    pub tuple_to_userset: Option<TupleToUserset>,
}

impl Leaf {
    pub fn users<I, S>(users: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            users: Some(Users {
                users: users.into_iter().map(Into::into).collect(),
            }),
            ..Self::default()
        }
    }

    pub fn computed(userset: &str) -> Self {
        Self {
            computed: Some(Computed {
                userset: userset.to_string(),
            }),
            ..Self::default()
        }
    }

    pub fn tuple_to_userset<I, S>(tupleset: &str, usersets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tuple_to_userset: Some(TupleToUserset {
                tupleset: tupleset.to_string(),
                computed: usersets
                    .into_iter()
                    .map(|userset| Computed {
                        userset: userset.into(),
                    })
                    .collect(),
            }),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Users {
    #[serde(default)]
    pub users: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Computed {
    pub userset: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TupleToUserset {
    #[serde(default)]
    pub tupleset: String,
    #[serde(default)]
    pub computed: Vec<Computed>,
}

/// Raw edge produced by one expansion call.
///
/// `parent` is the userset being expanded, `child` either a literal subject
/// or another userset to expand. `level` is the 1-based expansion round that
/// produced the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpansionRecord {
    pub parent: String,
    pub child: String,
    pub relation: String,
    #[serde(rename = "continue")]
    pub continue_expansion: bool,
    pub level: i32,
    pub seq: i32,
}

impl ExpansionRecord {
    /// Record stating that `name` resolves to itself
    pub fn self_edge(name: &str, level: i32) -> Self {
        let (_, relation) = split_userset(name);
        Self {
            parent: name.to_string(),
            child: name.to_string(),
            relation: relation.unwrap_or_default().to_string(),
            continue_expansion: false,
            level,
            seq: 0,
        }
    }

    pub fn reference(parent: &str, child: &str, relation: &str, level: i32) -> Self {
        Self {
            parent: parent.to_string(),
            child: child.to_string(),
            relation: relation.to_string(),
            continue_expansion: true,
            level,
            seq: 0,
        }
    }

    pub fn is_self_edge(&self) -> bool {
        self.parent == self.child
    }
}

/// Normalised edge: `user` satisfies `object`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeInfo {
    pub user: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub level: i32,
    pub seq: i32,
}

impl NodeInfo {
    /// Target of the edge, when the record has one
    pub fn object_id(&self) -> Option<&str> {
        self.object.as_deref().filter(|object| !object.is_empty())
    }

    pub fn is_self_edge(&self) -> bool {
        self.object_id() == Some(self.user.as_str())
    }
}

/// Split a userset id at the first `#`.
///
/// `"folder:2#viewer"` gives `("folder:2", Some("viewer"))`, a bare subject
/// such as `"user:anne"` gives `("user:anne", None)`.
pub fn split_userset(id: &str) -> (&str, Option<&str>) {
    match id.split_once(USERSET_SEPARATOR) {
        Some((object, relation)) => (object, Some(relation)),
        None => (id, None),
    }
}
