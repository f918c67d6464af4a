use std::cmp::Ordering;
use std::env;

// Kernel backends and instruction-set extensions we know how to use
#[derive(PartialEq, Eq, Debug)]
struct CpuFeature {
    name: &'static str,
    target_arch: &'static [&'static str],
    target_feature: &'static str,
    cfg_flag: &'static str,
    detected: bool,
}

impl CpuFeature {
    // Define priority order between 4-wide float backends (Lowest number == Highest Priority)
    fn priority(&self) -> usize {
        match self.name {
            "neon" => 0,
            "sse2" => 1,
            _ => usize::MAX, // lowest priority by default
        }
    }

    // Mutually exclusive backends for the Float4 kernel family
    fn backends() -> Vec<CpuFeature> {
        vec![
            CpuFeature {
                name: "sse2",
                target_arch: &["x86", "x86_64"],
                target_feature: "sse2",
                cfg_flag: "sse",
                detected: false,
            },
            CpuFeature {
                name: "neon",
                target_arch: &["aarch64"],
                target_feature: "neon",
                cfg_flag: "neon",
                detected: false,
            },
        ]
    }

    // Independent extensions, each one gates a single group of kernels
    fn extensions() -> Vec<CpuFeature> {
        vec![
            CpuFeature {
                name: "avx",
                target_arch: &["x86", "x86_64"],
                target_feature: "avx",
                cfg_flag: "avx",
                detected: false,
            },
            CpuFeature {
                name: "f16c",
                target_arch: &["x86", "x86_64"],
                target_feature: "f16c",
                cfg_flag: "f16c",
                detected: false,
            },
            CpuFeature {
                name: "popcnt",
                target_arch: &["x86_64"],
                target_feature: "popcnt",
                cfg_flag: "popcnt",
                detected: false,
            },
            CpuFeature {
                name: "lzcnt",
                target_arch: &["x86_64"],
                target_feature: "lzcnt",
                cfg_flag: "lzcnt",
                detected: false,
            },
            CpuFeature {
                name: "bmi1",
                target_arch: &["x86_64"],
                target_feature: "bmi1",
                cfg_flag: "bmi1",
                detected: false,
            },
        ]
    }
}

impl Ord for CpuFeature {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority().cmp(&other.priority())
    }
}

impl PartialOrd for CpuFeature {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Feature detection trait to make implementations more modular
trait CpuFeatureDetector {
    fn detect_features(&self, features: &mut [CpuFeature]);
    fn is_applicable(&self) -> bool;
}

// The features rustc will enable for the crate being compiled. Cargo exposes them
// to build scripts, so cross builds and `-C target-cpu` settings are honoured.
struct TargetDetector {
    arch: String,
    features: Vec<String>,
}

impl TargetDetector {
    fn from_env() -> Self {
        let arch = env::var("CARGO_CFG_TARGET_ARCH").unwrap_or_default();
        let features = env::var("CARGO_CFG_TARGET_FEATURE")
            .unwrap_or_default()
            .split(',')
            .map(str::to_string)
            .collect();

        Self { arch, features }
    }
}

impl CpuFeatureDetector for TargetDetector {
    fn detect_features(&self, features: &mut [CpuFeature]) {
        for feature in features.iter_mut() {
            feature.detected = feature.target_arch.contains(&self.arch.as_str())
                && self.features.iter().any(|f| f == feature.target_feature);
        }
    }

    fn is_applicable(&self) -> bool {
        env::var_os("CARGO_FEATURE_FORCE_SCALAR").is_none()
    }
}

struct PlatformDetector;
impl PlatformDetector {
    fn detect_cpu_features(detector: &dyn CpuFeatureDetector, features: &mut [CpuFeature]) {
        // With `force-scalar` nothing is detected and every kernel uses the fallback
        if detector.is_applicable() {
            detector.detect_features(features);
        }
    }

    fn apply(backends: &mut [CpuFeature], extensions: &[CpuFeature]) {
        // Sort backends by priority (highest first)
        backends.sort();

        // Find and use the highest detected backend (if any)
        // if no backend is detected, use fallback implementation
        let cfg_flag = backends
            .iter()
            .find(|cpu_feature| cpu_feature.detected)
            .map(|cpu_feature| cpu_feature.cfg_flag)
            .unwrap_or("fallback");

        println!("cargo:rustc-cfg={cfg_flag}");

        for extension in extensions.iter().filter(|e| e.detected) {
            println!("cargo:rustc-cfg={}", extension.cfg_flag);
        }

        for flag in ["neon", "sse", "avx", "f16c", "popcnt", "lzcnt", "bmi1", "fallback"] {
            println!("cargo::rustc-check-cfg=cfg({flag})");
        }
    }
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=CARGO_CFG_TARGET_FEATURE");

    let detector = TargetDetector::from_env();

    let mut backends = CpuFeature::backends();
    let mut extensions = CpuFeature::extensions();

    PlatformDetector::detect_cpu_features(&detector, &mut backends);
    PlatformDetector::detect_cpu_features(&detector, &mut extensions);

    PlatformDetector::apply(&mut backends, &extensions);
}
