//! Index spaces of the placement problem.
//!
//! Index 0 of every axis is the origin/sentinel row: user 0 is the source
//! node, server 0 is the origin server holding every master copy, object 0
//! and link 0 are unused slots. The `real_*` ranges below skip it, so the
//! convention lives in one place instead of in every loop bound.

use crate::{Error, Result};
use std::ops::Range;

/// The sentinel index representing the origin/source row of every axis.
pub const ORIGIN: usize = 0;

/// Sizes of the four index spaces of a problem instance.
///
/// Every count includes the sentinel slot at index 0, so a `Dimensions` with
/// `servers == 2` describes one origin server and one edge server.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Dimensions {
    /// Number of user slots, origin included.
    pub users: usize,
    /// Number of content object slots, sentinel included.
    pub objects: usize,
    /// Number of server slots, origin included.
    pub servers: usize,
    /// Number of network link slots, sentinel included.
    pub links: usize,
}

impl Dimensions {
    /// Constructs dimensions, checking that every axis has at least the
    /// sentinel slot.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyAxis`](../enum.Error.html) if any count is 0.
    pub fn new(users: usize, objects: usize, servers: usize, links: usize) -> Result<Self> {
        if users == 0 {
            return Err(Error::EmptyAxis("users"));
        }
        if objects == 0 {
            return Err(Error::EmptyAxis("objects"));
        }
        if servers == 0 {
            return Err(Error::EmptyAxis("servers"));
        }
        if links == 0 {
            return Err(Error::EmptyAxis("links"));
        }
        Ok(Self {
            users,
            objects,
            servers,
            links,
        })
    }

    /// The reference instance: 3 users, 3 objects, 2 servers, and one link
    /// slot per (user, server-or-origin) pair, i.e. 8 real links behind the
    /// sentinel slot.
    #[must_use]
    pub fn reference() -> Self {
        let users = 3;
        let servers = 2;
        Self {
            users,
            objects: 3,
            servers,
            links: users * (servers + 1),
        }
    }

    /// All user indices, origin included.
    pub fn all_users(self) -> Range<usize> {
        0..self.users
    }

    /// User indices excluding the origin.
    pub fn real_users(self) -> Range<usize> {
        1..self.users
    }

    /// Object indices excluding the sentinel slot.
    pub fn real_objects(self) -> Range<usize> {
        1..self.objects
    }

    /// Server indices excluding the origin server.
    pub fn real_servers(self) -> Range<usize> {
        1..self.servers
    }

    /// Link indices excluding the sentinel slot.
    pub fn real_links(self) -> Range<usize> {
        1..self.links
    }

    /// Shape of a single decision tensor.
    #[must_use]
    pub fn tensor_shape(self) -> (usize, usize, usize) {
        (self.users, self.objects, self.servers)
    }

    /// Number of entries in a single decision tensor.
    #[must_use]
    pub fn tensor_len(self) -> usize {
        self.users * self.objects * self.servers
    }

    /// Length of the flat vector holding both decision tensors.
    #[must_use]
    pub fn vector_len(self) -> usize {
        2 * self.tensor_len()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_empty_axis_is_rejected() {
        assert!(Dimensions::new(0, 3, 2, 9).is_err());
        assert!(Dimensions::new(3, 0, 2, 9).is_err());
        assert!(Dimensions::new(3, 3, 0, 9).is_err());
        assert!(Dimensions::new(3, 3, 2, 0).is_err());
        assert!(Dimensions::new(1, 1, 1, 1).is_ok());
    }

    #[test]
    fn test_reference_instance() {
        let dims = Dimensions::reference();
        assert_eq!(dims.tensor_shape(), (3, 3, 2));
        assert_eq!(dims.links, 9);
        assert_eq!(dims.real_links().count(), 8);
        assert_eq!(dims.tensor_len(), 18);
        assert_eq!(dims.vector_len(), 36);
    }

    #[test]
    fn test_real_ranges_skip_origin() {
        let dims = Dimensions::new(3, 4, 2, 5).unwrap();
        assert_eq!(dims.all_users().collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(dims.real_users().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(dims.real_objects().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(dims.real_servers().collect::<Vec<_>>(), vec![1]);
        assert!(!dims.real_users().contains(&ORIGIN));
    }
}
