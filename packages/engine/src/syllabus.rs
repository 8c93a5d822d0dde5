//! Syllabus registry: subject -> chapter -> topic.
//!
//! The engine validates every topic it is asked to update against this
//! registry, so a typo in a collaborator's output surfaces as
//! `InvalidTopic` instead of silently forking a user's mastery state.

use std::collections::{BTreeMap, HashSet};

#[derive(Debug, Clone, Default)]
pub struct Syllabus {
    subjects: BTreeMap<String, BTreeMap<String, Vec<String>>>,
    topic_set: HashSet<String>,
}

impl Syllabus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_topic(
        mut self,
        subject: impl Into<String>,
        chapter: impl Into<String>,
        topic: impl Into<String>,
    ) -> Self {
        let topic = topic.into();
        self.subjects
            .entry(subject.into())
            .or_default()
            .entry(chapter.into())
            .or_default()
            .push(topic.clone());
        self.topic_set.insert(topic);
        self
    }

    pub fn contains_topic(&self, topic: &str) -> bool {
        self.topic_set.contains(topic)
    }

    pub fn subjects(&self) -> impl Iterator<Item = &str> {
        self.subjects.keys().map(String::as_str)
    }

    /// All (subject, chapter, topic) triples, subject order.
    pub fn all_topics(&self) -> Vec<(&str, &str, &str)> {
        let mut out = Vec::new();
        for (subject, chapters) in &self.subjects {
            for (chapter, topics) in chapters {
                for topic in topics {
                    out.push((subject.as_str(), chapter.as_str(), topic.as_str()));
                }
            }
        }
        out
    }

    pub fn topic_count(&self) -> usize {
        self.topic_set.len()
    }

    /// The JEE syllabus: Physics, Chemistry, Mathematics.
    pub fn jee() -> Self {
        let mut syllabus = Self::new();
        let entries: &[(&str, &str, &[&str])] = &[
            ("Physics", "Mechanics", &[
                "Kinematics", "Laws of Motion", "Work Energy Power",
                "Rotational Motion", "Gravitation", "Properties of Matter",
            ]),
            ("Physics", "Thermodynamics", &[
                "Thermal Properties", "Kinetic Theory", "Thermodynamics",
            ]),
            ("Physics", "Electrodynamics", &[
                "Electrostatics", "Current Electricity", "Magnetic Effects",
                "Electromagnetic Induction", "AC Circuits", "EM Waves",
            ]),
            ("Physics", "Optics", &["Ray Optics", "Wave Optics"]),
            ("Physics", "Modern Physics", &[
                "Dual Nature", "Atomic Structure", "Nuclear Physics",
            ]),
            ("Chemistry", "Physical Chemistry", &[
                "Atomic Structure", "Chemical Bonding", "Gaseous State",
                "Thermodynamics", "Chemical Equilibrium", "Ionic Equilibrium",
                "Redox Reactions", "Electrochemistry", "Chemical Kinetics",
            ]),
            ("Chemistry", "Inorganic Chemistry", &[
                "Periodic Table", "Hydrogen", "S-Block Elements",
                "P-Block Elements", "D-Block Elements", "F-Block Elements",
                "Coordination Compounds", "Salt Analysis",
            ]),
            ("Chemistry", "Organic Chemistry", &[
                "Basic Concepts", "Hydrocarbons", "Haloalkanes",
                "Alcohols and Ethers", "Aldehydes and Ketones",
                "Carboxylic Acids", "Nitrogen Compounds", "Biomolecules",
            ]),
            ("Mathematics", "Algebra", &[
                "Complex Numbers", "Quadratic Equations", "Sequences and Series",
                "Permutations and Combinations", "Binomial Theorem",
                "Matrices and Determinants",
            ]),
            ("Mathematics", "Trigonometry", &[
                "Trigonometric Functions", "Inverse Trigonometric Functions",
                "Properties of Triangles",
            ]),
            ("Mathematics", "Coordinate Geometry", &[
                "Straight Line", "Circle", "Parabola", "Ellipse", "Hyperbola",
            ]),
            ("Mathematics", "Calculus", &[
                "Limits and Continuity", "Differentiation", "Integration",
                "Differential Equations", "Application of Derivatives",
            ]),
            ("Mathematics", "Vector and 3D", &[
                "Vector Algebra", "Three Dimensional Geometry",
            ]),
            ("Mathematics", "Statistics and Probability", &["Statistics", "Probability"]),
        ];

        for (subject, chapter, topics) in entries {
            for topic in *topics {
                syllabus = syllabus.add_topic(*subject, *chapter, *topic);
            }
        }
        syllabus
    }
}
