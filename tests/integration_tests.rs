//! Integration tests for the census pipeline.
//!
//! These tests run generation, normalization, classification and CSV output
//! end to end and check the pieces agree with each other.

use manifold_census::classify::backends::mock::MockClassifier;
use manifold_census::classify::skeleton::Skeleton;
use manifold_census::{
    AbsoluteId, CSV_HEADER, CensusParams, Classification, CombinatorialClassifier, FaceSlot,
    ManifoldClassifier, ParameterSpace, RelativeId, SweepConfig, SweepPresets, Triangulation,
    TriangulationParams, evaluate, run_census,
};
use std::fs;

#[cfg(test)]
mod integration_tests {
    use super::*;

    fn classify(params: TriangulationParams) -> Classification {
        let table = Triangulation::generate(params)
            .expect("Failed to generate triangulation")
            .into_absolute()
            .gluing_table();
        CombinatorialClassifier::new()
            .classify(&table)
            .expect("Failed to classify")
    }

    #[test]
    fn test_known_classifications() {
        // (n, s, p, m, t) -> H1, or None when not a manifold
        let cases = [
            ((1, 1, 0, 0, 0), Some("0")),
            ((1, 1, 1, 0, 0), Some("0")),
            ((2, 1, 1, 0, 0), Some("Z_3")),
            ((2, 1, 1, 0, 2), Some("0")),
            ((1, 2, 1, 0, 0), Some("0")),
            ((2, 1, 1, 1, 0), Some("Z")),
            ((2, 1, 1, 1, 1), Some("Z")),
            ((3, 1, 2, 1, 2), Some("2 Z + Z_2")),
            ((2, 2, 1, 1, 3), Some("Z_2")),
            ((3, 1, 1, 2, 1), Some("2 Z")),
            ((2, 3, 2, 1, 4), Some("Z_2 + Z_6")),
        ];

        for ((n, s, p, m, t), expected) in cases {
            let verdict = classify(TriangulationParams::new(n, s, p, m, t));
            assert_eq!(
                verdict.is_manifold,
                Some(expected.is_some()),
                "n={n} s={s} p={p} m={m} t={t}"
            );
            assert_eq!(verdict.homology_h1.as_deref(), expected);
        }
    }

    #[test]
    fn test_manifold_euler_characteristic_vanishes() {
        for params in ParameterSpace::new((1, 2), (2, 3)).iter() {
            let table = Triangulation::generate(params.triangulation_params())
                .expect("Failed to generate triangulation")
                .into_absolute()
                .gluing_table();
            let skeleton = Skeleton::build(&table).expect("Generated gluings are consistent");

            // every face class is shared by exactly two tetrahedron faces
            assert_eq!(skeleton.face_count(), 2 * skeleton.tetrahedron_count());

            if skeleton.edges_valid() && skeleton.vertex_links_spherical() {
                assert_eq!(skeleton.euler_characteristic(), 0, "{params}");
            }
        }
    }

    #[test]
    fn test_euler_characteristic_counts_ideal_vertices() {
        // each vertex contributes 1 - χ(link) / 2, so only ideal vertices count
        for params in ParameterSpace::new((1, 3), (2, 4)).iter() {
            let table = Triangulation::generate(params.triangulation_params())
                .expect("Failed to generate triangulation")
                .into_absolute()
                .gluing_table();
            let skeleton = Skeleton::build(&table).expect("Generated gluings are consistent");
            assert!(skeleton.edges_valid(), "{params}");

            let expected: i64 = skeleton
                .link_euler_characteristics()
                .iter()
                .map(|chi| 1 - chi / 2)
                .sum();
            assert_eq!(skeleton.euler_characteristic(), expected, "{params}");
        }
    }

    #[test]
    fn test_ideal_vertex_counts() {
        let cases = [((2, 1, 1, 0, 0), 0), ((2, 1, 1, 1, 0), 1), ((3, 1, 2, 1, 2), 1)];
        for ((n, s, p, m, t), ideal) in cases {
            let table = Triangulation::generate(TriangulationParams::new(n, s, p, m, t))
                .expect("Failed to generate triangulation")
                .into_absolute()
                .gluing_table();
            let skeleton = Skeleton::build(&table).expect("Generated gluings are consistent");
            assert_eq!(skeleton.ideal_vertex_count(), ideal, "n={n} s={s} p={p} m={m} t={t}");
        }
    }

    #[test]
    fn test_large_triangulation_homology() {
        let params = TriangulationParams::new(1, 400, 400, 0, 0);
        let verdict = classify(params);
        assert_eq!(verdict.is_manifold, Some(true));
        assert_eq!(verdict.homology_h1.as_deref(), Some("0"));
    }

    #[test]
    fn test_skeleton_counts() {
        let table = Triangulation::generate(TriangulationParams::new(2, 1, 1, 0, 0))
            .expect("Failed to generate triangulation")
            .into_absolute()
            .gluing_table();
        let skeleton = Skeleton::build(&table).expect("Generated gluings are consistent");
        assert_eq!(skeleton.tetrahedron_count(), 12);
        assert_eq!(skeleton.vertex_count(), 4);
        assert_eq!(skeleton.edge_count(), 16);
        assert_eq!(skeleton.face_count(), 24);
        assert_eq!(skeleton.component_count(), 1);
    }

    #[test]
    fn test_normalized_table_matches_relative_pairings() {
        let params = TriangulationParams::new(3, 2, 1, 2, 4);
        let relative = Triangulation::generate(params).expect("Failed to generate triangulation");
        let table = relative.clone().into_absolute().gluing_table();
        let ring = params.ring();

        for tet in relative.tetrahedra() {
            let flat = AbsoluteId::from_relative(tet.id, ring).value();
            for face in tet.faces() {
                let gluing = table
                    .gluing(flat, face.id())
                    .expect("Every face has a gluing");
                assert_eq!(
                    RelativeId::from_absolute(AbsoluteId(gluing.partner), ring),
                    face.pairing
                );
                assert_eq!(gluing.perm, face.perm);
            }
        }
    }

    #[test]
    fn test_face_ids_index_the_gluing_table() {
        let tri = Triangulation::generate(TriangulationParams::new(1, 1, 1, 0, 0))
            .expect("Failed to generate triangulation")
            .into_absolute();
        let table = tri.gluing_table();
        let first = &tri.tetrahedra()[0];
        for slot in FaceSlot::ALL {
            let face = first.face(slot);
            let gluing = table.gluing(0, slot.id()).expect("face present");
            assert_eq!(gluing.partner, face.pairing.value());
        }
    }

    #[test]
    fn test_sweep_ordering_and_sizes() {
        let config = SweepConfig {
            quiet: true,
            ..SweepConfig::new((2, 2), (2, 2))
        };
        let mut mock = MockClassifier::new(Classification::invalid());
        let summary =
            run_census(&config, &mut mock, &mut std::io::sink()).expect("Failed to run census");

        assert_eq!(summary.combinations, 6);
        assert_eq!(mock.calls(), &[12; 6]);

        let combos: Vec<CensusParams> = ParameterSpace::new((2, 2), (2, 2)).iter().collect();
        let order: Vec<(u32, u32)> = combos.iter().map(|c| (c.m, c.t)).collect();
        assert_eq!(order, vec![(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (1, 2)]);
        assert!(combos.iter().all(|c| c.r == 2 && c.s == 1 && c.n == 2));
    }

    #[test]
    fn test_sweep_to_csv() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("small.csv");
        let config = SweepConfig {
            output: Some(path.clone()),
            quiet: true,
            ..SweepPresets::small()
        };

        let mut classifier = CombinatorialClassifier::new();
        let summary = run_census(&config, &mut classifier, &mut std::io::sink())
            .expect("Failed to run census");

        let csv = fs::read_to_string(&path).expect("Failed to read CSV");
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], CSV_HEADER);
        assert_eq!(lines.len(), summary.combinations + 1);
        assert_eq!(summary.failures, 0);
        assert_eq!(summary.hyperbolic, 0);
        // no generated triangulation in this range reverses an edge
        assert_eq!(summary.manifolds, summary.combinations);

        for (row, params) in lines[1..].iter().zip(ParameterSpace::new((1, 2), (2, 3)).iter()) {
            let fields: Vec<&str> = row.split(", ").collect();
            assert_eq!(fields.len(), 9);
            let prefix = format!(
                "{}, {}, {}, {}, {}, ",
                params.n, params.r, params.s, params.m, params.t
            );
            assert!(row.starts_with(&prefix), "{row} vs {prefix}");
            assert!(matches!(fields[5], "True" | "False"));
            assert_eq!(fields[6], "N/A");
            if fields[5] == "False" {
                assert_eq!(fields[8], "N/A");
            }
        }
    }

    #[test]
    fn test_sweep_continues_after_classifier_failures() {
        let config = SweepConfig {
            quiet: true,
            ..SweepPresets::tiny()
        };
        let mut mock = MockClassifier::hyperbolic().failing_on(&[1]);
        let mut console = Vec::new();
        let summary = run_census(&config, &mut mock, &mut console).expect("Failed to run census");

        assert_eq!(summary.combinations, 3);
        assert_eq!(summary.failures, 1);
        assert_eq!(summary.manifolds, 2);
        assert_eq!(summary.hyperbolic, 2);
    }

    #[test]
    fn test_console_report_per_combination() {
        let config = SweepPresets::tiny();
        let mut classifier = CombinatorialClassifier::new();
        let mut console = Vec::new();
        run_census(&config, &mut classifier, &mut console).expect("Failed to run census");

        let text = String::from_utf8(console).expect("utf8");
        assert_eq!(text.matches("Manifold?\t").count(), 3);
        assert!(text.starts_with("R=2, N=1, S=1, M=0, T=0\n"));
    }

    #[test]
    fn test_evaluate_matches_direct_classification() {
        let params = CensusParams::new(2, 2, 1, 0, 0);
        let record =
            evaluate(params, &mut CombinatorialClassifier::new()).expect("Failed to evaluate");
        assert_eq!(record.classification, classify(params.triangulation_params()));
        assert_eq!(record.csv_row(), "2, 2, 1, 0, 0, True, N/A, N/A, Z_3");
    }
}
