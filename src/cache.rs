use alloc::{collections::BTreeMap, string::String};

use crate::any::Instance;

/// Built instances by identifier
#[derive(Default)]
pub(crate) struct Cache {
    map: BTreeMap<String, Instance>,
}

impl Cache {
    #[inline]
    pub(crate) fn insert(&mut self, id: String, instance: Instance) -> Option<Instance> {
        self.map.insert(id, instance)
    }

    #[inline]
    #[must_use]
    pub(crate) fn get(&self, id: &str) -> Option<Instance> {
        self.map.get(id).cloned()
    }

    #[inline]
    #[must_use]
    pub(crate) fn contains(&self, id: &str) -> bool {
        self.map.contains_key(id)
    }

    #[inline]
    pub(crate) fn remove(&mut self, id: &str) -> Option<Instance> {
        self.map.remove(id)
    }
}

#[cfg(test)]
mod tests {
    use super::Cache;
    use crate::any::instance;

    use alloc::{string::String, sync::Arc};

    #[test]
    fn test_insert_get_remove() {
        let mut cache = Cache::default();
        let value = instance(1u8);

        assert!(cache.insert(String::from("a"), value.clone()).is_none());
        assert!(Arc::ptr_eq(&cache.get("a").unwrap(), &value));
        assert!(cache.contains("a"));
        assert!(cache.remove("a").is_some());
        assert!(!cache.contains("a"));
    }
}
