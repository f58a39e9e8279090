use std::collections::BTreeMap;

use crate::filter::PointBuffer;

/// Named point objects the segmentation session reads from and writes to.
pub trait SceneRegistry {
    fn find_object(&self, name: &str) -> Option<&PointBuffer>;
    fn add_object(&mut self, name: &str, points: PointBuffer);
    fn remove_object(&mut self, name: &str) -> Option<PointBuffer>;
}

pub trait RenderTrigger {
    fn request_redraw(&mut self);
}

impl<F: FnMut()> RenderTrigger for F {
    fn request_redraw(&mut self) {
        self()
    }
}

/// In-process scene keyed by object name. `add_object` replaces any object
/// already stored under the same name.
#[derive(Clone, Debug, Default)]
pub struct MemoryScene {
    objects: BTreeMap<String, PointBuffer>,
}

impl MemoryScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.objects.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl SceneRegistry for MemoryScene {
    fn find_object(&self, name: &str) -> Option<&PointBuffer> {
        self.objects.get(name)
    }

    fn add_object(&mut self, name: &str, points: PointBuffer) {
        self.objects.insert(name.to_string(), points);
    }

    fn remove_object(&mut self, name: &str) -> Option<PointBuffer> {
        self.objects.remove(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_replaces_by_name() -> crate::Result<()> {
        let mut scene = MemoryScene::new();
        scene.add_object("cloud", PointBuffer::new(vec![0.0; 3], Vec::new())?);
        scene.add_object("cloud", PointBuffer::new(vec![0.0; 6], Vec::new())?);
        assert_eq!(scene.len(), 1);
        assert_eq!(scene.names().collect::<Vec<_>>(), vec!["cloud"]);
        assert_eq!(scene.find_object("cloud").map(PointBuffer::len), Some(2));
        assert!(scene.remove_object("cloud").is_some());
        assert!(scene.find_object("cloud").is_none());
        Ok(())
    }

    #[test]
    fn closures_trigger_redraws() {
        let mut count = 0;
        let mut trigger = || count += 1;
        trigger.request_redraw();
        trigger.request_redraw();
        assert_eq!(count, 2);
    }
}
