use crate::{
    client::ExpandClient,
    config::ExpanderConfig,
    models::*,
};
use futures::future::join_all;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

/// Level assigned to the records of the first expansion call
pub const FIRST_LEVEL: i32 = 1;

/// Tree expander turns rewrite trees into leveled expansion records by
/// repeatedly calling the expansion service, one round per level.
///
/// Every round expands the userset references found by the previous one.
/// The calls of a round run concurrently and the round completes only once
/// all of them have answered. A failed call counts as an empty answer, so
/// one unreachable branch never aborts the whole run.
pub struct TreeExpander {
    client: Arc<dyn ExpandClient>,
    config: ExpanderConfig,
}

impl TreeExpander {
    pub fn new(client: Arc<dyn ExpandClient>) -> Self {
        Self {
            client,
            config: ExpanderConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ExpanderConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ExpanderConfig {
        &self.config
    }

    /// Expand `relation` on `object` until no record asks for another round.
    ///
    /// Returns the records of all levels, level 1 first, in the order the
    /// frontier was issued within each level.
    #[instrument(skip(self), fields(levels = tracing::field::Empty))]
    pub async fn expand(&self, object: &str, relation: &str) -> Vec<ExpansionRecord> {
        let started = Instant::now();
        let deadline = self.config.deadline();

        let mut records = Vec::new();
        let mut visited: HashSet<TupleKey> = HashSet::new();
        let mut frontier = vec![TupleKey::new(object, relation)];
        let mut level = FIRST_LEVEL;

        while !frontier.is_empty() {
            if let Some(max_depth) = self.config.max_depth {
                if u32::try_from(level).map_or(true, |l| l > max_depth) {
                    info!(
                        level,
                        max_depth,
                        pending = frontier.len(),
                        "Depth limit reached, stopping expansion"
                    );
                    break;
                }
            }

            let calls: Vec<TupleKey> = if self.config.dedupe_calls {
                frontier
                    .into_iter()
                    .filter(|key| visited.insert(key.clone()))
                    .collect()
            } else {
                frontier
            };

            if calls.is_empty() {
                debug!(level, "Frontier already expanded");
                break;
            }

            let batch = join_all(calls.iter().map(|key| self.expand_one(key, level)));

            let answers = match deadline {
                Some(budget) => {
                    let remaining = budget.saturating_sub(started.elapsed());
                    match tokio::time::timeout(remaining, batch).await {
                        Ok(answers) => answers,
                        Err(_) => {
                            warn!(
                                level,
                                calls = calls.len(),
                                budget_ms = u64::try_from(budget.as_millis()).unwrap_or(u64::MAX),
                                "Expansion deadline exceeded, returning partial records"
                            );
                            break;
                        }
                    }
                }
                None => batch.await,
            };

            let produced: Vec<ExpansionRecord> = answers.into_iter().flatten().collect();

            frontier = produced
                .iter()
                .filter(|record| record.continue_expansion)
                .map(|record| next_call(record, relation))
                .collect();

            info!(
                level,
                calls = calls.len(),
                records = produced.len(),
                next_frontier = frontier.len(),
                "Expansion level complete"
            );

            records.extend(produced);
            level = level.saturating_add(1);
        }

        tracing::Span::current().record("levels", level.saturating_sub(FIRST_LEVEL));
        records
    }

    /// One expansion call. Errors degrade to "no tree".
    async fn expand_one(&self, key: &TupleKey, level: i32) -> Vec<ExpansionRecord> {
        debug!(object = %key.object, relation = %key.relation, level, "Expanding");

        match self.client.expand(&key.object, &key.relation).await {
            Ok(Some(tree)) => records_from_tree(&tree, key, level),
            Ok(None) => {
                debug!(%key, level, "No tree returned");
                Vec::new()
            }
            Err(e) => {
                warn!(%key, level, error = %e, "Expansion call failed, treating branch as empty");
                Vec::new()
            }
        }
    }
}

/// Turn one rewrite tree into records.
///
/// The first record is always the self-edge of the tree's root. Leaves found
/// directly on the root or anywhere below its unions then contribute, in tree
/// order: literal users (carrying the relation of the call), tuple-to-userset
/// references and computed references (both with a blank relation).
pub fn records_from_tree(tree: &RewriteTree, key: &TupleKey, level: i32) -> Vec<ExpansionRecord> {
    let parent = if tree.name.is_empty() {
        key.userset_id()
    } else {
        tree.name.clone()
    };

    let mut records = vec![ExpansionRecord::self_edge(&parent, level)];
    collect_leaves(tree, &parent, &key.relation, level, &mut records);
    records
}

fn collect_leaves(
    node: &RewriteTree,
    parent: &str,
    relation: &str,
    level: i32,
    records: &mut Vec<ExpansionRecord>,
) {
    if let Some(leaf) = &node.leaf {
        if let Some(users) = &leaf.users {
            records.extend(
                users
                    .users
                    .iter()
                    .map(|user| ExpansionRecord::reference(parent, user, relation, level)),
            );
        }

        if let Some(ttu) = &leaf.tuple_to_userset {
            records.extend(
                ttu.computed
                    .iter()
                    .map(|computed| ExpansionRecord::reference(parent, &computed.userset, "", level)),
            );
        }

        if let Some(computed) = &leaf.computed {
            records.push(ExpansionRecord::reference(parent, &computed.userset, "", level));
        }
    }

    if let Some(union) = &node.union {
        for child in &union.nodes {
            collect_leaves(child, parent, relation, level, records);
        }
    }
}

/// The call that expands a `continue` record.
///
/// The relation comes from the child's own `#` suffix, then the record's
/// relation, then the parent's suffix, then the originally queried relation.
pub fn next_call(record: &ExpansionRecord, query_relation: &str) -> TupleKey {
    let (object, suffix) = split_userset(&record.child);

    let relation = suffix
        .filter(|r| !r.is_empty())
        .or_else(|| Some(record.relation.as_str()).filter(|r| !r.is_empty()))
        .or_else(|| split_userset(&record.parent).1.filter(|r| !r.is_empty()))
        .unwrap_or(query_relation);

    TupleKey::new(object, relation)
}
