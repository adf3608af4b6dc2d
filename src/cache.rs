use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::credential::WifiCredential;
use crate::qr::QrImage;

type Key = (WifiCredential, u32);

/// Bounded memo of rendered codes; the oldest entry is evicted first.
#[derive(Debug)]
pub struct PreviewCache {
    capacity: usize,
    entries: Mutex<VecDeque<(Key, Arc<QrImage>)>>,
}

impl PreviewCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    pub fn get(&self, credential: &WifiCredential, scale: u32) -> Option<Arc<QrImage>> {
        let entries = self.entries.lock();
        entries
            .iter()
            .find(|((cred, s), _)| *s == scale && cred == credential)
            .map(|(_, image)| Arc::clone(image))
    }

    pub fn insert(&self, credential: WifiCredential, scale: u32, image: Arc<QrImage>) {
        if self.capacity == 0 {
            return;
        }
        let mut entries = self.entries.lock();
        entries.retain(|((cred, s), _)| !(*s == scale && *cred == credential));
        while entries.len() >= self.capacity {
            entries.pop_front();
        }
        entries.push_back(((credential, scale), image));
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::Security;

    fn image(tag: u8) -> Arc<QrImage> {
        Arc::new(QrImage {
            png: vec![tag],
            modules: 29,
            scale: 1,
        })
    }

    #[test]
    fn evicts_oldest_entry_when_full() {
        let cache = PreviewCache::new(2);
        let a = WifiCredential::new("a", None, Security::None);
        let b = WifiCredential::new("b", None, Security::None);
        let c = WifiCredential::new("c", None, Security::None);
        cache.insert(a.clone(), 5, image(1));
        cache.insert(b.clone(), 5, image(2));
        cache.insert(c.clone(), 5, image(3));
        assert_eq!(cache.len(), 2);
        assert!(cache.get(&a, 5).is_none());
        assert_eq!(cache.get(&c, 5).unwrap().png, vec![3]);
    }

    #[test]
    fn scale_is_part_of_the_key() {
        let cache = PreviewCache::new(4);
        let a = WifiCredential::new("a", None, Security::None);
        cache.insert(a.clone(), 5, image(1));
        assert!(cache.get(&a, 6).is_none());
        assert!(cache.get(&a, 5).is_some());
    }

    #[test]
    fn zero_capacity_disables_caching() {
        let cache = PreviewCache::new(0);
        let a = WifiCredential::new("a", None, Security::None);
        cache.insert(a.clone(), 5, image(1));
        assert!(cache.is_empty());
    }
}
