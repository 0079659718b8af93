//! Manifest fixtures shared by integration tests

use getmesh::manifest::Catalog;

/// A manifest shaped like the published one, newest first
pub const MANIFEST: &str = r#"{
    "istio_distributions": [
        {
            "version": "1.9.0",
            "flavor": "tetrate",
            "flavor_version": 0,
            "k8s_versions": ["1.17", "1.18", "1.19", "1.20"],
            "release_notes": ["https://istio.io/latest/news/releases/1.9.x/announcing-1.9/"],
            "is_security_patch": false
        },
        {
            "version": "1.8.3",
            "flavor": "tetrate",
            "flavor_version": 0,
            "k8s_versions": ["1.16", "1.17", "1.18", "1.19"],
            "release_notes": ["https://istio.io/latest/news/releases/1.8.x/announcing-1.8.3/"],
            "is_security_patch": false
        },
        {
            "version": "1.8.2",
            "flavor": "tetrate",
            "flavor_version": 0,
            "k8s_versions": ["1.16", "1.17", "1.18", "1.19"],
            "is_security_patch": true
        },
        {
            "version": "1.8.2",
            "flavor": "tetratefips",
            "flavor_version": 1,
            "k8s_versions": ["1.16", "1.17", "1.18", "1.19"],
            "is_security_patch": true
        },
        {
            "version": "1.8.1",
            "flavor": "tetrate",
            "flavor_version": 0,
            "k8s_versions": ["1.16", "1.17", "1.18", "1.19"]
        },
        {
            "version": "1.7.7",
            "flavor": "tetrate",
            "flavor_version": 0,
            "k8s_versions": ["1.16", "1.17", "1.18"],
            "end_of_life": "2021-05-21"
        }
    ],
    "istio_minor_versions_eol_dates": {
        "1.9": "2021-11-21",
        "1.8": "2021-08-21",
        "1.7": "2021-05-21"
    }
}"#;

pub fn catalog() -> Catalog {
    Catalog::from_json(MANIFEST).unwrap()
}
