use std::{collections::VecDeque, marker::PhantomData, time::Duration, time::Instant};

/// Hands out small keys, recycling released ones after a grace period so a
/// stale reference to a freed key cannot immediately alias a new owner.
pub struct KeyGenerator<K: From<u16> + Into<u16> + Copy> {
    recycled_local_keys: VecDeque<(u16, Instant)>,
    recycle_timeout: Duration,
    next_new_key: u16,
    phantom: PhantomData<K>,
}

impl<K: From<u16> + Into<u16> + Copy> KeyGenerator<K> {
    pub fn new(recycle_timeout: Duration) -> Self {
        Self {
            recycled_local_keys: VecDeque::new(),
            recycle_timeout,
            next_new_key: 0,
            phantom: PhantomData,
        }
    }

    /// Gets a new, unused key.
    pub fn generate(&mut self) -> K {
        if let Some((key, timestamp)) = self.recycled_local_keys.front() {
            if timestamp.elapsed() >= self.recycle_timeout {
                let key = *key;
                self.recycled_local_keys.pop_front();
                return K::from(key);
            }
        }

        let new_key = self.next_new_key;
        self.next_new_key = self.next_new_key.wrapping_add(1);
        K::from(new_key)
    }

    /// Returns a key to the pool. It becomes available again once the
    /// recycle timeout has elapsed.
    pub fn recycle_key(&mut self, key: &K) {
        let local_key: u16 = (*key).into();
        self.recycled_local_keys
            .push_back((local_key, Instant::now()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_sequential() {
        let mut generator = KeyGenerator::<u16>::new(Duration::from_secs(1));
        assert_eq!(generator.generate(), 0);
        assert_eq!(generator.generate(), 1);
        assert_eq!(generator.generate(), 2);
    }

    #[test]
    fn recycled_keys_wait_out_the_timeout() {
        let mut generator = KeyGenerator::<u16>::new(Duration::from_secs(10));
        let first = generator.generate();
        generator.recycle_key(&first);
        // Not recycled yet, so the next key is fresh.
        assert_eq!(generator.generate(), 1);
    }

    #[test]
    fn zero_timeout_recycles_immediately() {
        let mut generator = KeyGenerator::<u16>::new(Duration::from_millis(0));
        let first = generator.generate();
        generator.recycle_key(&first);
        assert_eq!(generator.generate(), first);
    }
}
