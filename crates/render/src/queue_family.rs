use anyhow::Result;
use ash::vk;
use tracing::debug;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct QueueFamilyIndices {
    pub graphics_family: Option<u32>,
    pub present_family: Option<u32>,
}

impl QueueFamilyIndices {
    pub fn new() -> QueueFamilyIndices {
        QueueFamilyIndices {
            graphics_family: None,
            present_family: None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.graphics_family.is_some() && self.present_family.is_some()
    }

    /// Walks `families` in order, stopping once both a graphics and a present
    /// family are known. `present_support` is asked about each family index.
    pub fn find<F>(families: &[vk::QueueFamilyProperties], mut present_support: F) -> Result<Self>
    where
        F: FnMut(u32) -> Result<bool>,
    {
        debug!("System can support {} queue families!", families.len());

        let mut res = QueueFamilyIndices::new();

        for (i, family) in families.iter().enumerate() {
            let index = i as u32;

            if family.queue_count > 0 && family.queue_flags.contains(vk::QueueFlags::GRAPHICS) {
                res.graphics_family = Some(index);
                debug!("Queue Family {index} is suitable for graphics!");
            }

            if family.queue_count > 0 && present_support(index)? {
                res.present_family = Some(index);
                debug!("Queue Family {index} is suitable for presenting!");
            }

            if res.is_complete() {
                break;
            }
        }

        Ok(res)
    }

    pub fn resolve(&self) -> Option<QueueFamilies> {
        Some(QueueFamilies {
            graphics: self.graphics_family?,
            present: self.present_family?,
        })
    }
}

/// A complete pair of queue family indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueFamilies {
    pub graphics: u32,
    pub present: u32,
}

impl QueueFamilies {
    /// One entry per distinct family, graphics first.
    pub fn unique(&self) -> Vec<u32> {
        if self.graphics == self.present {
            vec![self.graphics]
        } else {
            vec![self.graphics, self.present]
        }
    }

    /// Sharing mode for images used by both families, with the family list
    /// the swapchain needs for concurrent sharing.
    pub fn sharing(&self) -> (vk::SharingMode, Vec<u32>) {
        if self.graphics != self.present {
            (vk::SharingMode::CONCURRENT, vec![self.graphics, self.present])
        } else {
            (vk::SharingMode::EXCLUSIVE, vec![])
        }
    }
}

#[cfg(test)]
mod tests {
    use anyhow::bail;

    use super::*;

    fn family(flags: vk::QueueFlags, count: u32) -> vk::QueueFamilyProperties {
        vk::QueueFamilyProperties {
            queue_flags: flags,
            queue_count: count,
            ..Default::default()
        }
    }

    #[test]
    fn single_family_does_both() {
        let families = [family(vk::QueueFlags::GRAPHICS | vk::QueueFlags::COMPUTE, 16)];
        let indices = QueueFamilyIndices::find(&families, |_| Ok(true)).unwrap();

        assert!(indices.is_complete());
        let resolved = indices.resolve().unwrap();
        assert_eq!(resolved, QueueFamilies { graphics: 0, present: 0 });
        assert_eq!(resolved.unique(), vec![0]);
        assert_eq!(resolved.sharing(), (vk::SharingMode::EXCLUSIVE, vec![]));
    }

    #[test]
    fn split_families() {
        let families = [
            family(vk::QueueFlags::GRAPHICS, 1),
            family(vk::QueueFlags::TRANSFER, 1),
            family(vk::QueueFlags::COMPUTE, 1),
        ];
        let indices = QueueFamilyIndices::find(&families, |i| Ok(i == 2)).unwrap();
        let resolved = indices.resolve().unwrap();

        assert_eq!(resolved, QueueFamilies { graphics: 0, present: 2 });
        assert_eq!(resolved.unique(), vec![0, 2]);
        assert_eq!(resolved.sharing(), (vk::SharingMode::CONCURRENT, vec![0, 2]));
    }

    #[test]
    fn stops_at_first_complete_family() {
        let families = [
            family(vk::QueueFlags::GRAPHICS, 1),
            family(vk::QueueFlags::GRAPHICS, 1),
        ];
        let mut asked = vec![];
        let indices = QueueFamilyIndices::find(&families, |i| {
            asked.push(i);
            Ok(true)
        })
        .unwrap();

        assert_eq!(asked, vec![0]);
        assert_eq!(indices.graphics_family, Some(0));
    }

    #[test]
    fn empty_families_are_skipped() {
        let families = [
            family(vk::QueueFlags::GRAPHICS, 0),
            family(vk::QueueFlags::GRAPHICS, 2),
        ];
        let indices = QueueFamilyIndices::find(&families, |_| Ok(true)).unwrap();

        assert_eq!(indices.resolve(), Some(QueueFamilies { graphics: 1, present: 1 }));
    }

    #[test]
    fn no_present_support_is_incomplete() {
        let families = [family(vk::QueueFlags::GRAPHICS, 1)];
        let indices = QueueFamilyIndices::find(&families, |_| Ok(false)).unwrap();

        assert!(!indices.is_complete());
        assert_eq!(indices.resolve(), None);
    }

    #[test]
    fn support_query_errors_propagate() {
        let families = [family(vk::QueueFlags::GRAPHICS, 1)];
        let res = QueueFamilyIndices::find(&families, |_| bail!("surface lost"));

        assert!(res.is_err());
    }
}
