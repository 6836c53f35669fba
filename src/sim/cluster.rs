//! Connectivity analysis over same-colored balls
//!
//! Two balls of the same color are connected when their centers are within
//! the group radius. Clusters are the connected components of that graph.
//! Everything here is O(n²) per color, which is fine for tens of balls
//! evaluated once per frame.

use glam::Vec2;

use super::physics::Tuning;
use super::state::{Arena, Ball, BallColor, PALETTE};

/// A connected set of same-colored balls (indices into the batch)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    pub color: BallColor,
    pub members: Vec<usize>,
}

/// Set of balls reachable from `seed` where edges join points within `radius`
///
/// Returns a visited flag per point. Traversal is an explicit stack
/// worklist; exploration order doesn't matter since edges are symmetric.
pub fn reachable(points: &[Vec2], seed: usize, radius: f32) -> Vec<bool> {
    let mut visited = vec![false; points.len()];
    if seed >= points.len() {
        return visited;
    }

    let mut stack = vec![seed];
    visited[seed] = true;
    while let Some(current) = stack.pop() {
        for (next, point) in points.iter().enumerate() {
            if !visited[next] && points[current].distance(*point) <= radius {
                visited[next] = true;
                stack.push(next);
            }
        }
    }
    visited
}

/// Label every point with a component id (0-based, in order of discovery)
pub fn components(points: &[Vec2], radius: f32) -> Vec<usize> {
    const UNLABELED: usize = usize::MAX;
    let mut labels = vec![UNLABELED; points.len()];
    let mut next_label = 0;

    for seed in 0..points.len() {
        if labels[seed] != UNLABELED {
            continue;
        }
        labels[seed] = next_label;
        let mut stack = vec![seed];
        while let Some(current) = stack.pop() {
            for (next, point) in points.iter().enumerate() {
                if labels[next] == UNLABELED && points[current].distance(*point) <= radius {
                    labels[next] = next_label;
                    stack.push(next);
                }
            }
        }
        next_label += 1;
    }
    labels
}

/// Clustering and win detection bound to an arena and a group radius
#[derive(Debug, Clone, Copy)]
pub struct Analyzer {
    pub arena: Arena,
    pub group_radius: f32,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(Arena::default(), &Tuning::default())
    }
}

impl Analyzer {
    pub fn new(arena: Arena, tuning: &Tuning) -> Self {
        Self {
            arena,
            group_radius: tuning.group_radius,
        }
    }

    /// Batch indices of each palette color, in palette order
    fn color_groups(&self, balls: &[Ball]) -> [Vec<usize>; PALETTE.len()] {
        let mut groups: [Vec<usize>; PALETTE.len()] = Default::default();
        for (i, ball) in balls.iter().enumerate() {
            groups[ball.color().index()].push(i);
        }
        groups
    }

    fn centers(&self, balls: &[Ball], indices: &[usize]) -> Vec<Vec2> {
        indices.iter().map(|&i| balls[i].center(&self.arena)).collect()
    }

    /// Whether all balls of `color` form one cluster
    ///
    /// A color with no balls is trivially connected.
    pub fn is_color_connected(&self, balls: &[Ball], color: BallColor) -> bool {
        self.group_connected(balls, &self.color_groups(balls)[color.index()])
    }

    fn group_connected(&self, balls: &[Ball], group: &[usize]) -> bool {
        let points = self.centers(balls, group);
        reachable(&points, 0, self.group_radius).into_iter().all(|seen| seen)
    }

    /// Whether any two differently colored balls sit within the group radius
    pub fn colors_touch(&self, balls: &[Ball]) -> bool {
        balls.iter().enumerate().any(|(i, a)| {
            balls[i + 1..].iter().any(|b| {
                a.color() != b.color()
                    && a.center(&self.arena).distance(b.center(&self.arena)) <= self.group_radius
            })
        })
    }

    /// The puzzle is solved: every color is one cluster and no colors touch
    ///
    /// An empty batch is never won.
    pub fn is_won(&self, balls: &[Ball]) -> bool {
        if balls.is_empty() {
            return false;
        }
        let all_connected = self
            .color_groups(balls)
            .iter()
            .all(|group| self.group_connected(balls, group));
        all_connected && !self.colors_touch(balls)
    }

    /// All clusters in the batch, grouped by palette color
    pub fn clusters(&self, balls: &[Ball]) -> Vec<Cluster> {
        let mut clusters = Vec::new();
        for (color, group) in PALETTE.iter().zip(self.color_groups(balls)) {
            let labels = components(&self.centers(balls, &group), self.group_radius);
            let count = labels.iter().max().map_or(0, |max| max + 1);
            let mut members = vec![Vec::new(); count];
            for (&label, &index) in labels.iter().zip(&group) {
                members[label].push(index);
            }
            clusters.extend(members.into_iter().map(|members| Cluster {
                color: *color,
                members,
            }));
        }
        clusters
    }

    /// Per-ball highlight flags, in batch order
    ///
    /// A ball is highlighted when it shares a cluster with at least one other
    /// ball, even if its color has not merged into a single cluster yet.
    pub fn highlights(&self, balls: &[Ball]) -> Vec<bool> {
        let mut flags = vec![false; balls.len()];
        for cluster in self.clusters(balls) {
            if cluster.members.len() >= 2 {
                for index in cluster.members {
                    flags[index] = true;
                }
            }
        }
        flags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ball(id: u64, x: f32, y: f32, color: BallColor) -> Ball {
        Ball::new(id, Vec2::new(x, y), color)
    }

    /// Four reds in the top-left corner, four greens in the bottom-right
    fn solved_fixture() -> Vec<Ball> {
        vec![
            ball(1, 20.0, 20.0, BallColor::Red),
            ball(2, 60.0, 20.0, BallColor::Red),
            ball(3, 20.0, 60.0, BallColor::Red),
            ball(4, 60.0, 60.0, BallColor::Red),
            ball(5, 500.0, 400.0, BallColor::Green),
            ball(6, 540.0, 400.0, BallColor::Green),
            ball(7, 500.0, 440.0, BallColor::Green),
            ball(8, 540.0, 440.0, BallColor::Green),
        ]
    }

    #[test]
    fn test_reachable_chain() {
        let points = [
            Vec2::new(0.0, 0.0),
            Vec2::new(90.0, 0.0),
            Vec2::new(180.0, 0.0),
            Vec2::new(400.0, 0.0),
        ];
        let visited = reachable(&points, 0, 100.0);
        assert_eq!(visited, vec![true, true, true, false]);

        let from_far = reachable(&points, 3, 100.0);
        assert_eq!(from_far, vec![false, false, false, true]);
    }

    #[test]
    fn test_reachable_radius_inclusive() {
        let points = [Vec2::new(0.0, 0.0), Vec2::new(100.0, 0.0)];
        assert_eq!(reachable(&points, 0, 100.0), vec![true, true]);
    }

    #[test]
    fn test_reachable_empty() {
        assert!(reachable(&[], 0, 100.0).is_empty());
    }

    #[test]
    fn test_components_labels() {
        let points = [
            Vec2::new(0.0, 0.0),
            Vec2::new(300.0, 0.0),
            Vec2::new(50.0, 0.0),
            Vec2::new(350.0, 0.0),
            Vec2::new(600.0, 0.0),
        ];
        assert_eq!(components(&points, 100.0), vec![0, 1, 0, 1, 2]);
    }

    #[test]
    fn test_win_when_separated_and_connected() {
        let analyzer = Analyzer::default();
        assert!(analyzer.is_won(&solved_fixture()));
    }

    #[test]
    fn test_no_win_when_colors_touch() {
        let analyzer = Analyzer::default();
        let mut balls = solved_fixture();
        // Move one green next to the red corner
        balls[4].pos = Vec2::new(140.0, 60.0);
        assert!(analyzer.colors_touch(&balls));
        assert!(!analyzer.is_won(&balls));
    }

    #[test]
    fn test_colors_touch_at_exact_group_radius() {
        let analyzer = Analyzer::default();
        // Centers (110, 110) and (210, 110): exactly 100 apart
        let balls = vec![
            ball(1, 100.0, 100.0, BallColor::Red),
            ball(2, 200.0, 100.0, BallColor::Blue),
        ];
        assert!(analyzer.colors_touch(&balls));
        assert!(!analyzer.is_won(&balls));

        let apart = vec![
            ball(1, 100.0, 100.0, BallColor::Red),
            ball(2, 200.5, 100.0, BallColor::Blue),
        ];
        assert!(!analyzer.colors_touch(&apart));
        assert!(analyzer.is_won(&apart));
    }

    #[test]
    fn test_no_win_when_color_split() {
        let analyzer = Analyzer::default();
        let mut balls = solved_fixture();
        // Pull two reds away to the bottom-left corner
        balls[2].pos = Vec2::new(20.0, 440.0);
        balls[3].pos = Vec2::new(60.0, 440.0);
        assert!(!analyzer.is_color_connected(&balls, BallColor::Red));
        assert!(analyzer.is_color_connected(&balls, BallColor::Green));
        assert!(!analyzer.is_won(&balls));
    }

    #[test]
    fn test_empty_batch_not_won() {
        assert!(!Analyzer::default().is_won(&[]));
    }

    #[test]
    fn test_highlight_sub_cluster_without_win() {
        let analyzer = Analyzer::default();
        let balls = vec![
            // Two reds together, two reds scattered
            ball(1, 20.0, 20.0, BallColor::Red),
            ball(2, 50.0, 20.0, BallColor::Red),
            ball(3, 300.0, 250.0, BallColor::Red),
            ball(4, 560.0, 460.0, BallColor::Red),
            ball(5, 560.0, 20.0, BallColor::Blue),
            ball(6, 20.0, 460.0, BallColor::Blue),
        ];

        assert!(!analyzer.is_won(&balls));
        assert_eq!(
            analyzer.highlights(&balls),
            vec![true, true, false, false, false, false]
        );
    }

    #[test]
    fn test_highlight_sub_cluster_not_containing_first_ball() {
        let analyzer = Analyzer::default();
        let balls = vec![
            ball(1, 20.0, 20.0, BallColor::Red),
            ball(2, 400.0, 300.0, BallColor::Red),
            ball(3, 430.0, 300.0, BallColor::Red),
        ];
        assert_eq!(analyzer.highlights(&balls), vec![false, true, true]);
    }

    #[test]
    fn test_clusters_grouped_by_color() {
        let analyzer = Analyzer::default();
        let clusters = analyzer.clusters(&solved_fixture());
        assert_eq!(
            clusters,
            vec![
                Cluster {
                    color: BallColor::Red,
                    members: vec![0, 1, 2, 3],
                },
                Cluster {
                    color: BallColor::Green,
                    members: vec![4, 5, 6, 7],
                },
            ]
        );
    }

    #[test]
    fn test_group_radius_from_tuning() {
        let tuning = Tuning {
            group_radius: 30.0,
            ..Default::default()
        };
        let analyzer = Analyzer::new(Arena::default(), &tuning);
        // Reds are 40 apart: too far with the tighter radius
        assert!(!analyzer.is_won(&solved_fixture()));
    }
}
