//! Permission-filtered folder tree assembly.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use tracing::{debug, warn};

use archivehub_core::result::AppResult;
use archivehub_core::types::FolderId;
use archivehub_database::store::{ArchiveStore, FolderStore};
use archivehub_entity::archive::Archive;
use archivehub_entity::folder::{Folder, TreeNode};

use crate::context::OperationContext;

/// A visited folder waiting to be assembled into a [`TreeNode`].
struct Visit {
    folder: Folder,
    records: Vec<Archive>,
    children: Vec<usize>,
}

/// Builds folder trees containing only what the caller may see.
#[derive(Debug, Clone)]
pub struct TreeService {
    folders: Arc<dyn FolderStore>,
    archives: Arc<dyn ArchiveStore>,
    max_depth: usize,
}

impl TreeService {
    /// Creates a new tree service descending at most `max_depth` levels.
    pub fn new(
        folders: Arc<dyn FolderStore>,
        archives: Arc<dyn ArchiveStore>,
        max_depth: usize,
    ) -> Self {
        Self {
            folders,
            archives,
            max_depth,
        }
    }

    /// Builds the forest below `parent_id` ([`FolderId::ROOT`] for the whole
    /// hierarchy).
    ///
    /// A folder whose labels the caller lacks is dropped together with its
    /// whole subtree. Siblings are ordered by id. Levels are fetched
    /// breadth-first; a folder reached a second time is skipped.
    pub async fn build_tree(
        &self,
        ctx: &OperationContext,
        parent_id: FolderId,
    ) -> AppResult<Vec<TreeNode>> {
        let mut visits: Vec<Visit> = Vec::new();
        let mut top_level: Vec<usize> = Vec::new();
        let mut visited: HashSet<FolderId> = HashSet::new();
        visited.insert(parent_id);

        let mut queue: VecDeque<(Option<usize>, FolderId, usize)> = VecDeque::new();
        queue.push_back((None, parent_id, 0));

        while let Some((slot, folder_id, depth)) = queue.pop_front() {
            if depth >= self.max_depth {
                warn!(
                    folder_id = %folder_id,
                    max_depth = self.max_depth,
                    "Tree depth limit reached, not descending further"
                );
                continue;
            }

            let children = ctx
                .guard(self.folders.list_children_visible(folder_id, &ctx.permission))
                .await?;

            for folder in children {
                if !visited.insert(folder.id) {
                    warn!(
                        folder_id = %folder.id,
                        parent_id = %folder_id,
                        "Folder reached twice while building tree, skipping"
                    );
                    continue;
                }

                let records = ctx
                    .guard(self.archives.list_by_folder(folder.id, Some(&ctx.permission)))
                    .await?;

                let index = visits.len();
                let id = folder.id;
                visits.push(Visit {
                    folder,
                    records,
                    children: Vec::new(),
                });
                match slot {
                    Some(parent) => visits[parent].children.push(index),
                    None => top_level.push(index),
                }
                queue.push_back((Some(index), id, depth + 1));
            }
        }

        debug!(
            parent_id = %parent_id,
            folders = visits.len(),
            "Tree traversal finished"
        );

        Ok(assemble(visits, &top_level))
    }
}

/// Turn the flat visit list into nested nodes.
///
/// A child is always pushed after its parent, so walking the list backwards
/// finishes every child before the parent that owns it.
fn assemble(visits: Vec<Visit>, top_level: &[usize]) -> Vec<TreeNode> {
    let mut built: Vec<Option<TreeNode>> = Vec::with_capacity(visits.len());
    built.resize_with(visits.len(), || None);

    for (index, visit) in visits.into_iter().enumerate().rev() {
        let children = visit
            .children
            .iter()
            .filter_map(|child| built[*child].take())
            .collect();
        built[index] = Some(TreeNode {
            folder: visit.folder,
            children,
            records: visit.records,
        });
    }

    top_level
        .iter()
        .filter_map(|index| built[*index].take())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use archivehub_core::types::UserId;
    use archivehub_database::MemoryStore;
    use archivehub_entity::folder::CreateFolder;
    use archivehub_entity::permission::PermissionSet;

    async fn add(store: &MemoryStore, parent: FolderId, name: &str, labels: &str) -> Folder {
        FolderStore::create(
            store,
            &CreateFolder {
                name: name.to_string(),
                path: format!("/{name}"),
                parent_id: parent,
                group_permission: PermissionSet::parse(labels),
                creator_id: UserId::new(1),
            },
        )
        .await
        .unwrap()
    }

    fn ctx(labels: &str) -> OperationContext {
        OperationContext::new(UserId::new(1), "a@example.com", PermissionSet::parse(labels))
    }

    fn service(store: &MemoryStore, max_depth: usize) -> TreeService {
        TreeService::new(Arc::new(store.clone()), Arc::new(store.clone()), max_depth)
    }

    #[tokio::test]
    async fn test_nested_and_ordered() {
        let store = MemoryStore::new();
        let a = add(&store, FolderId::ROOT, "a", "").await;
        let b = add(&store, FolderId::ROOT, "b", "").await;
        let a1 = add(&store, a.id, "a1", "").await;
        let a1x = add(&store, a1.id, "a1x", "").await;

        let forest = service(&store, 64).build_tree(&ctx(""), FolderId::ROOT).await.unwrap();
        let ids: Vec<_> = forest.iter().map(|n| n.folder.id).collect();
        assert_eq!(ids, vec![a.id, b.id]);
        assert_eq!(forest[0].children[0].folder.id, a1.id);
        assert_eq!(forest[0].children[0].children[0].folder.id, a1x.id);
        assert_eq!(forest[0].folder_count(), 3);
    }

    #[tokio::test]
    async fn test_hidden_folder_hides_subtree() {
        let store = MemoryStore::new();
        let secret = add(&store, FolderId::ROOT, "secret", "admin").await;
        add(&store, secret.id, "inner", "").await;
        add(&store, FolderId::ROOT, "public", "").await;

        let forest = service(&store, 64).build_tree(&ctx("user"), FolderId::ROOT).await.unwrap();
        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].folder.name, "public");
    }

    #[tokio::test]
    async fn test_depth_limit() {
        let store = MemoryStore::new();
        let a = add(&store, FolderId::ROOT, "a", "").await;
        let b = add(&store, a.id, "b", "").await;
        add(&store, b.id, "c", "").await;

        let forest = service(&store, 2).build_tree(&ctx(""), FolderId::ROOT).await.unwrap();
        assert_eq!(forest[0].folder_count(), 2);
        assert!(forest[0].children[0].children.is_empty());
    }

    #[tokio::test]
    async fn test_self_parented_folder_is_skipped() {
        let store = MemoryStore::new();
        let a = add(&store, FolderId::ROOT, "a", "").await;
        // A row whose parent is itself; only reachable through bad data.
        let looped = add(&store, FolderId::new(a.id.get() + 1), "loop", "").await;
        assert_eq!(looped.parent_id, looped.id);

        let forest = service(&store, 64)
            .build_tree(&ctx(""), looped.id)
            .await
            .unwrap();
        assert!(forest.is_empty());
    }

    #[tokio::test]
    async fn test_subtree_from_folder() {
        let store = MemoryStore::new();
        let a = add(&store, FolderId::ROOT, "a", "").await;
        let a1 = add(&store, a.id, "a1", "").await;

        let forest = service(&store, 64).build_tree(&ctx(""), a.id).await.unwrap();
        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].folder.id, a1.id);
    }
}
