//! Validating tree storage over a raw node store

use crate::error::StorageError;
use crate::store::{NodeStore, TreeStorage, DEFAULT_MAX_DEPTH};
use crate::tree::node::LinkDefinition;
use crate::tree::params::{TreeElement, TreeParameters};
use crate::types::LinkId;
use parking_lot::Mutex;
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};
use tracing::debug;

/// Children grouped by parent, each group sorted by (weight, title, id)
type ChildMap = HashMap<Option<LinkId>, Vec<LinkDefinition>>;

/// Tree storage enforcing the parent/cycle/depth invariants
pub struct MenuTreeStorage<S: NodeStore> {
    store: S,
    max_depth: usize,
    /// Serialises validate-then-write sequences
    write_lock: Mutex<()>,
}

impl<S: NodeStore> MenuTreeStorage<S> {
    pub fn new(store: S) -> Self {
        Self::with_max_depth(store, DEFAULT_MAX_DEPTH)
    }

    pub fn with_max_depth(store: S, max_depth: usize) -> Self {
        Self {
            store,
            max_depth,
            write_lock: Mutex::new(()),
        }
    }

    pub fn node_store(&self) -> &S {
        &self.store
    }

    fn child_map(&self, menu_name: &str) -> Result<ChildMap, StorageError> {
        let mut map: ChildMap = HashMap::new();
        for def in self.store.in_menu(menu_name)? {
            map.entry(def.parent.clone()).or_default().push(def);
        }
        for siblings in map.values_mut() {
            siblings.sort_by(|a, b| {
                a.weight
                    .cmp(&b.weight)
                    .then_with(|| a.title.cmp(&b.title))
                    .then_with(|| a.id.cmp(&b.id))
            });
        }
        Ok(map)
    }

    fn direct_children(&self, def: &LinkDefinition) -> Result<Vec<LinkDefinition>, StorageError> {
        Ok(self
            .store
            .in_menu(&def.menu_name)?
            .into_iter()
            .filter(|c| c.parent.as_deref() == Some(def.id.as_str()))
            .collect())
    }

    /// Walk parent references from `id` upward.
    fn root_path(&self, id: &str) -> Result<Vec<LinkDefinition>, StorageError> {
        let mut path = Vec::new();
        let mut seen = HashSet::new();
        let mut current = self.store.get(id)?;
        while let Some(def) = current {
            if !seen.insert(def.id.clone()) {
                break;
            }
            current = match &def.parent {
                Some(parent) => self.store.get(parent)?,
                None => None,
            };
            path.push(def);
        }
        Ok(path)
    }

    fn all_child_ids_in(&self, map: &ChildMap, id: &str) -> Vec<LinkId> {
        let mut out = Vec::new();
        let mut queue = VecDeque::from([id.to_string()]);
        while let Some(current) = queue.pop_front() {
            if let Some(children) = map.get(&Some(current)) {
                for child in children {
                    out.push(child.id.clone());
                    queue.push_back(child.id.clone());
                }
            }
        }
        out
    }

    fn height_in(map: &ChildMap, id: &str) -> usize {
        map.get(&Some(id.to_string()))
            .map(|children| {
                children
                    .iter()
                    .map(|c| Self::height_in(map, &c.id))
                    .max()
                    .unwrap_or(0)
            })
            .unwrap_or(0)
            + 1
    }

    fn save_locked(&self, definition: LinkDefinition) -> Result<(), StorageError> {
        let existing = self.store.get(&definition.id)?;

        let depth = match &definition.parent {
            None => 1,
            Some(parent_id) => {
                if parent_id == &definition.id {
                    return Err(StorageError::Cycle {
                        id: definition.id.clone(),
                        parent: parent_id.clone(),
                    });
                }
                let parent = self.store.get(parent_id)?.ok_or_else(|| {
                    StorageError::ParentNotFound {
                        id: definition.id.clone(),
                        parent: parent_id.clone(),
                    }
                })?;
                if parent.menu_name != definition.menu_name {
                    return Err(StorageError::ParentInOtherMenu {
                        id: definition.id.clone(),
                        parent: parent_id.clone(),
                        menu: definition.menu_name.clone(),
                        parent_menu: parent.menu_name,
                    });
                }
                let ancestors = self.root_path(parent_id)?;
                if ancestors.iter().any(|a| a.id == definition.id) {
                    return Err(StorageError::Cycle {
                        id: definition.id.clone(),
                        parent: parent_id.clone(),
                    });
                }
                ancestors.len() + 1
            }
        };

        let mut batch = Vec::new();
        let height = match &existing {
            Some(old) => {
                let map = self.child_map(&old.menu_name)?;
                if old.menu_name != definition.menu_name {
                    for child_id in self.all_child_ids_in(&map, &old.id) {
                        if let Some(mut child) = self.store.get(&child_id)? {
                            child.menu_name = definition.menu_name.clone();
                            batch.push(child);
                        }
                    }
                }
                Self::height_in(&map, &old.id)
            }
            None => 1,
        };

        let reach = depth + height - 1;
        if reach > self.max_depth {
            return Err(StorageError::DepthExceeded {
                id: definition.id.clone(),
                depth: reach,
                max: self.max_depth,
            });
        }

        debug!(id = %definition.id, menu = %definition.menu_name, depth, "saving menu link");
        batch.insert(0, definition);
        self.store.put_batch(&batch)
    }

    fn delete_locked(&self, id: &str) -> Result<(), StorageError> {
        let Some(def) = self.store.get(id)? else {
            return Ok(());
        };
        let children: Vec<LinkDefinition> = self
            .direct_children(&def)?
            .into_iter()
            .map(|mut child| {
                child.parent = def.parent.clone();
                child
            })
            .collect();
        if !children.is_empty() {
            self.store.put_batch(&children)?;
        }
        debug!(id, reparented = children.len(), "deleting menu link");
        self.store.remove(id)
    }

    fn build(
        &self,
        map: &ChildMap,
        parent: Option<LinkId>,
        depth: usize,
        relative_limit: Option<usize>,
        params: &TreeParameters,
    ) -> Vec<TreeElement> {
        let Some(siblings) = map.get(&parent) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        for def in siblings {
            if params.only_enabled && !def.enabled {
                continue;
            }
            if params.excludes_provider(&def.provider) {
                continue;
            }
            let has_children = map.contains_key(&Some(def.id.clone()));
            let within_depth = params.max_depth.map_or(true, |max| depth < max)
                && relative_limit.map_or(true, |limit| limit > 1);
            let expanded = params
                .expanded_parents
                .as_ref()
                .map_or(true, |set| set.contains(&def.id));
            let children = if has_children && within_depth && expanded {
                self.build(
                    map,
                    Some(def.id.clone()),
                    depth + 1,
                    relative_limit.map(|limit| limit - 1),
                    params,
                )
            } else {
                Vec::new()
            };
            out.push(TreeElement {
                definition: def.clone(),
                depth,
                has_children,
                children,
            });
        }
        out
    }

    /// Drop elements shallower than `min_depth`, promoting their descendants.
    fn lift(elements: Vec<TreeElement>, min_depth: usize) -> Vec<TreeElement> {
        let mut out = Vec::new();
        for element in elements {
            if element.depth >= min_depth {
                out.push(element);
            } else {
                out.extend(Self::lift(element.children, min_depth));
            }
        }
        out
    }
}

impl<S: NodeStore> TreeStorage for MenuTreeStorage<S> {
    fn max_depth(&self) -> usize {
        self.max_depth
    }

    fn load(&self, id: &str) -> Result<Option<LinkDefinition>, StorageError> {
        self.store.get(id)
    }

    fn load_multiple(&self, ids: &[LinkId]) -> Result<Vec<LinkDefinition>, StorageError> {
        let mut out = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(def) = self.store.get(id)? {
                out.push(def);
            }
        }
        Ok(out)
    }

    fn save(&self, definition: LinkDefinition) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock();
        self.save_locked(definition)
    }

    fn delete(&self, id: &str) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock();
        self.delete_locked(id)
    }

    fn load_tree_data(
        &self,
        menu_name: &str,
        params: &TreeParameters,
    ) -> Result<Vec<TreeElement>, StorageError> {
        let map = self.child_map(menu_name)?;
        let (start, depth) = match &params.root {
            Some(root) => {
                let root_depth = self.root_path(root)?.len();
                (Some(root.clone()), root_depth + 1)
            }
            None => (None, 1),
        };
        let tree = self.build(&map, start, depth, None, params);
        Ok(match params.min_depth {
            Some(min) if min > depth => Self::lift(tree, min),
            _ => tree,
        })
    }

    fn load_subtree_data(
        &self,
        id: &str,
        max_relative_depth: Option<usize>,
    ) -> Result<Option<TreeElement>, StorageError> {
        let Some(def) = self.store.get(id)? else {
            return Ok(None);
        };
        let map = self.child_map(&def.menu_name)?;
        let depth = self.root_path(id)?.len();
        let params = TreeParameters::all();
        let within = max_relative_depth.map_or(true, |limit| limit > 1);
        let children = if within {
            self.build(
                &map,
                Some(def.id.clone()),
                depth + 1,
                max_relative_depth.map(|limit| limit - 1),
                &params,
            )
        } else {
            Vec::new()
        };
        Ok(Some(TreeElement {
            has_children: map.contains_key(&Some(def.id.clone())),
            definition: def,
            depth,
            children,
        }))
    }

    fn get_root_path_ids(&self, id: &str) -> Result<Vec<LinkId>, StorageError> {
        Ok(self.root_path(id)?.into_iter().map(|d| d.id).collect())
    }

    fn get_all_child_ids(&self, id: &str) -> Result<Vec<LinkId>, StorageError> {
        let Some(def) = self.store.get(id)? else {
            return Ok(Vec::new());
        };
        let map = self.child_map(&def.menu_name)?;
        Ok(self.all_child_ids_in(&map, id))
    }

    fn get_subtree_height(&self, id: &str) -> Result<usize, StorageError> {
        let Some(def) = self.store.get(id)? else {
            return Ok(0);
        };
        let map = self.child_map(&def.menu_name)?;
        Ok(Self::height_in(&map, id))
    }

    fn ids_in_menu(&self, menu_name: &str) -> Result<Vec<LinkId>, StorageError> {
        Ok(self
            .store
            .in_menu(menu_name)?
            .into_iter()
            .map(|d| d.id)
            .collect())
    }

    fn count_menu_links(&self, menu_name: Option<&str>) -> Result<usize, StorageError> {
        match menu_name {
            Some(menu) => Ok(self.store.in_menu(menu)?.len()),
            None => Ok(self.store.all()?.len()),
        }
    }

    fn get_menu_names(&self) -> Result<BTreeSet<String>, StorageError> {
        Ok(self.store.all()?.into_iter().map(|d| d.menu_name).collect())
    }

    fn load_by_route(
        &self,
        route_name: &str,
        menu_name: Option<&str>,
    ) -> Result<Vec<LinkDefinition>, StorageError> {
        Ok(self
            .store
            .all()?
            .into_iter()
            .filter(|d| d.route_name.as_deref() == Some(route_name))
            .filter(|d| menu_name.map_or(true, |menu| d.menu_name == menu))
            .collect())
    }

    fn rebuild(&self, definitions: &[LinkDefinition]) -> Result<Vec<LinkId>, StorageError> {
        let _guard = self.write_lock.lock();
        let keep: HashSet<&str> = definitions.iter().map(|d| d.id.as_str()).collect();

        // Parents before children regardless of input order.
        let mut pending: Vec<LinkDefinition> = definitions.to_vec();
        while !pending.is_empty() {
            let before = pending.len();
            let mut deferred = Vec::new();
            for mut def in pending {
                let ready = match &def.parent {
                    None => true,
                    Some(parent) => self.store.get(parent)?.is_some(),
                };
                if ready {
                    def.discovered = true;
                    self.save_locked(def)?;
                } else {
                    deferred.push(def);
                }
            }
            if deferred.len() == before {
                // Nothing progressed: let the first one fail validation.
                let mut def = deferred.remove(0);
                def.discovered = true;
                self.save_locked(def)?;
            }
            pending = deferred;
        }

        let stale: Vec<LinkId> = self
            .store
            .all()?
            .into_iter()
            .filter(|d| d.discovered && !keep.contains(d.id.as_str()))
            .map(|d| d.id)
            .collect();
        for id in &stale {
            self.delete_locked(id)?;
        }
        debug!(kept = keep.len(), pruned = stale.len(), "rebuilt menu links");
        Ok(stale)
    }
}
