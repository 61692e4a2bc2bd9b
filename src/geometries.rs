//! Composite scene graph with cached bounding boxes.

use std::sync::OnceLock;

use crate::{
    aabb::Aabb,
    algebra::Point,
    intersection::Hit,
    object::Geometry,
    ray::Ray,
};

/// One child of a composite: a single geometry or a nested composite.
#[derive(Clone, Debug)]
pub enum Node {
    Leaf(Geometry),
    Group(Geometries),
}

impl Node {
    pub fn bounding_box(&self) -> Option<Aabb> {
        match self {
            Self::Leaf(g) => g.bounding_box(),
            Self::Group(g) => g.bounding_box(),
        }
    }

    fn calculate_intersections(&self, ray: &Ray, max_distance: f64) -> Option<Vec<Hit<'_>>> {
        match self {
            Self::Leaf(g) => g.calculate_intersections(ray, max_distance),
            Self::Group(g) => g.calculate_intersections(ray, max_distance),
        }
    }

    fn any_hit(&self, ray: &Ray, max_distance: f64) -> bool {
        match self {
            Self::Leaf(g) => g.any_hit(ray, max_distance),
            Self::Group(g) => g.any_hit(ray, max_distance),
        }
    }
}

impl From<Geometry> for Node {
    fn from(g: Geometry) -> Self { Self::Leaf(g) }
}

impl From<Geometries> for Node {
    fn from(g: Geometries) -> Self { Self::Group(g) }
}

/// Ordered collection of geometries and nested collections.
///
/// The bounding box is computed on first request and kept until the children
/// change. Call [`Geometries::prepare`] before sharing the tree across
/// threads so no worker pays for the first fill.
#[derive(Clone, Debug, Default)]
pub struct Geometries {
    children: Vec<Node>,
    bbox: OnceLock<Option<Aabb>>,
}

impl Geometries {
    pub fn new() -> Self { Self::default() }

    /// Builder-style [`Geometries::add`].
    pub fn with(mut self, node: impl Into<Node>) -> Self {
        self.add(node);
        self
    }

    pub fn add(&mut self, node: impl Into<Node>) {
        self.children.push(node.into());
        self.bbox = OnceLock::new();
    }

    pub fn len(&self) -> usize { self.children.len() }

    pub fn is_empty(&self) -> bool { self.children.is_empty() }

    pub fn children(&self) -> &[Node] { &self.children }

    /// Union of all child boxes. `None` when empty or when any child is
    /// unbounded; such composites are never pruned.
    pub fn bounding_box(&self) -> Option<Aabb> {
        *self.bbox.get_or_init(|| {
            let mut boxes = self.children.iter().map(Node::bounding_box);
            let first = boxes.next()??;
            boxes.try_fold(first, |acc, b| Some(acc.union(&b?)))
        })
    }

    /// Fill the bounding-box cache of this composite and every nested one.
    pub fn prepare(&self) {
        for child in &self.children {
            if let Node::Group(g) = child {
                g.prepare();
            }
        }
        self.bounding_box();
    }

    /// All intersection points along the ray, `None` when nothing is hit.
    pub fn find_intersections(&self, ray: &Ray) -> Option<Vec<Point>> {
        self.calculate_intersections(ray, f64::INFINITY)
            .map(|hits| hits.into_iter().map(|h| h.point).collect())
    }

    /// Every hit closer than `max_distance`, `None` when there is none.
    ///
    /// Nested composites whose box the ray misses are skipped whole.
    pub fn calculate_intersections(&self, ray: &Ray, max_distance: f64) -> Option<Vec<Hit<'_>>> {
        let mut result: Option<Vec<Hit<'_>>> = None;
        for child in &self.children {
            if let Node::Group(g) = child {
                if g.bounding_box().is_some_and(|b| !b.hits(ray, max_distance)) {
                    continue;
                }
            }
            if let Some(hits) = child.calculate_intersections(ray, max_distance) {
                result.get_or_insert_with(Vec::new).extend(hits);
            }
        }
        result
    }

    /// True when anything lies strictly closer than `max_distance`.
    ///
    /// Stops at the first hit found; used for shadow rays.
    pub fn any_hit(&self, ray: &Ray, max_distance: f64) -> bool {
        self.children.iter().any(|child| {
            if let Node::Group(g) = child {
                if g.bounding_box().is_some_and(|b| !b.hits(ray, max_distance)) {
                    return false;
                }
            }
            child.any_hit(ray, max_distance)
        })
    }

    /// Regroup the children into a binary tree of nested composites.
    ///
    /// Bounded children are split at the median centroid along the longest
    /// axis of their centroid spread until at most `leaf_size` remain per
    /// group. Unbounded children stay at the top level.
    pub fn into_hierarchy(self, leaf_size: usize) -> Geometries {
        let leaf_size = leaf_size.max(1);
        let mut top = Geometries::new();
        let mut bounded = Vec::new();
        for child in self.children {
            match child.bounding_box() {
                Some(b) => bounded.push((child, b.centroid())),
                None => top.add(child),
            }
        }

        if bounded.len() <= leaf_size {
            for (child, _) in bounded {
                top.add(child);
            }
        } else {
            top.add(build_node(bounded, leaf_size));
        }
        log::debug!("built hierarchy with {} top-level children", top.len());
        top
    }
}

fn build_node(mut items: Vec<(Node, Point)>, leaf_size: usize) -> Geometries {
    if items.len() <= leaf_size {
        return items.into_iter().map(|(child, _)| child).collect();
    }

    let centroids: Vec<Point> = items.iter().map(|(_, c)| *c).collect();
    let axis = Aabb::from_points(&centroids).map_or(0, |b| b.longest_axis());
    items.sort_by(|a, b| a.1.xyz().get(axis).total_cmp(&b.1.xyz().get(axis)));

    let right = items.split_off(items.len() / 2);
    Geometries::new()
        .with(build_node(items, leaf_size))
        .with(build_node(right, leaf_size))
}

impl<N: Into<Node>> FromIterator<N> for Geometries {
    fn from_iter<I: IntoIterator<Item = N>>(iter: I) -> Self {
        Self {
            children: iter.into_iter().map(Into::into).collect(),
            bbox: OnceLock::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::Vector;
    use crate::plane::Plane;
    use crate::sphere::Sphere;

    fn sphere(x: f64, y: f64, z: f64) -> Geometry {
        Geometry::new(Sphere::new(Point::new(x, y, z), 1.0).unwrap())
    }

    fn ray(o: [f64; 3], d: [f64; 3]) -> Ray {
        Ray::new(o.into(), Vector::try_from(d).unwrap()).unwrap()
    }

    fn depth(g: &Geometries) -> usize {
        1 + g
            .children()
            .iter()
            .filter_map(|c| match c {
                Node::Group(g) => Some(depth(g)),
                Node::Leaf(_) => None,
            })
            .max()
            .unwrap_or(0)
    }

    #[test]
    fn test_empty_composite_has_no_intersections() {
        let empty = Geometries::new();
        let r = ray([0.0, 0.0, 0.0], [0.0, 0.0, -1.0]);
        assert!(empty.find_intersections(&r).is_none());
        assert!(empty.calculate_intersections(&r, f64::INFINITY).is_none());
        assert!(empty.bounding_box().is_none());
    }

    #[test]
    fn test_miss_is_none() {
        let g = Geometries::new().with(sphere(0.0, 0.0, -5.0));
        assert!(g.find_intersections(&ray([0.0, 0.0, 0.0], [0.0, 0.0, 1.0])).is_none());
    }

    #[test]
    fn test_collects_hits_from_all_children() {
        let g = Geometries::new()
            .with(sphere(0.0, 0.0, -5.0))
            .with(Geometries::new().with(sphere(0.0, 0.0, -10.0)));
        let r = ray([0.0, 0.0, 0.0], [0.0, 0.0, -1.0]);
        assert_eq!(g.find_intersections(&r).unwrap().len(), 4);

        // only the near sphere lies within 7
        let hits = g.calculate_intersections(&r, 7.0).unwrap();
        assert_eq!(hits.len(), 2);
        let closest = r.closest_hit(hits).unwrap();
        assert!(closest.point.approx_eq(&Point::new(0.0, 0.0, -4.0)));
    }

    #[test]
    fn test_bounding_box_union_and_reset() {
        let mut g = Geometries::new().with(sphere(0.0, 0.0, 0.0));
        let b = g.bounding_box().unwrap();
        assert_eq!(b.max, Point::new(1.0, 1.0, 1.0));

        g.add(sphere(5.0, 0.0, 0.0));
        let b = g.bounding_box().unwrap();
        assert_eq!(b.min, Point::new(-1.0, -1.0, -1.0));
        assert_eq!(b.max, Point::new(6.0, 1.0, 1.0));

        g.add(Geometry::new(Plane::new(Point::ORIGIN, Vector::Y).unwrap()));
        assert!(g.bounding_box().is_none());
    }

    #[test]
    fn test_unbounded_group_is_still_searched() {
        let inner = Geometries::new()
            .with(Geometry::new(Plane::new(Point::new(0.0, -2.0, 0.0), Vector::Y).unwrap()));
        let g = Geometries::new().with(inner);
        g.prepare();
        let hits = g.find_intersections(&ray([0.0, 0.0, 0.0], [0.0, -1.0, 0.0])).unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn test_into_hierarchy_preserves_hits() {
        let flat: Geometries = (0..8).map(|k| sphere(3.0 * k as f64, 0.0, 0.0)).collect();
        let plane = Geometry::new(Plane::new(Point::new(0.0, -5.0, 0.0), Vector::Y).unwrap());
        let flat = flat.with(plane);

        let along = ray([-5.0, 0.0, 0.0], [1.0, 0.0, 0.0]);
        let down = ray([9.0, 10.0, 0.0], [0.0, -1.0, 0.0]);
        let flat_along = flat.find_intersections(&along).unwrap().len();
        let flat_down = flat.find_intersections(&down).unwrap().len();

        let tree = flat.into_hierarchy(2);
        tree.prepare();
        // the plane plus one group holding the spheres
        assert_eq!(tree.len(), 2);
        assert!(depth(&tree) >= 3);

        assert_eq!(tree.find_intersections(&along).unwrap().len(), flat_along);
        assert_eq!(tree.find_intersections(&down).unwrap().len(), flat_down);
        assert_eq!(flat_along, 16);
        // sphere at x = 9 twice, then the plane
        assert_eq!(flat_down, 3);
    }

    #[test]
    fn test_any_hit_respects_distance() {
        let g = Geometries::new()
            .with(Geometries::new().with(sphere(0.0, 0.0, -5.0)))
            .with(Geometry::new(Plane::new(Point::new(0.0, 0.0, -20.0), Vector::Z).unwrap()));
        g.prepare();
        let r = ray([0.0, 0.0, 0.0], [0.0, 0.0, -1.0]);
        assert!(g.any_hit(&r, f64::INFINITY));
        // the sphere starts at 4
        assert!(!g.any_hit(&r, 3.5));
        assert!(g.any_hit(&r, 4.5));
        // only the plane lies in this direction
        let aside = ray([5.0, 5.0, 0.0], [0.0, 0.0, -1.0]);
        assert!(g.any_hit(&aside, 25.0));
        assert!(!g.any_hit(&aside, 15.0));
        assert!(!Geometries::new().any_hit(&r, f64::INFINITY));
    }

    #[test]
    fn test_pruned_group_reports_nothing() {
        let far = Geometries::new().with(sphere(20.0, 20.0, 20.0));
        let g = Geometries::new().with(far);
        g.prepare();
        assert!(g.find_intersections(&ray([0.0, 0.0, 0.0], [0.0, 0.0, -1.0])).is_none());
    }
}
