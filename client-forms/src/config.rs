use serde::Deserialize;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5198";
pub const DEFAULT_OCR_URL: &str = "http://localhost:8501/";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Prescription server root, without a trailing path
    pub api_base_url: String,
    /// OCR web app embedded by the prescriptions page
    pub ocr_url: String,
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            ocr_url: DEFAULT_OCR_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

/// Address the OCR frame points at. The client has no other link to the
/// OCR service.
pub fn ocr_frame_url(config: &ClientConfig) -> &str {
    &config.ocr_url
}

/// Medication names accepted by the offline prescription notes
pub const MEDICATION_OPTIONS: [&str; 20] = [
    "Ibuprofen",
    "Aspirin",
    "Paracetamol",
    "Amoxicillin",
    "Metformin",
    "Omeprazole",
    "Lipitor",
    "Lisinopril",
    "Levothyroxine",
    "Azithromycin",
    "Albuterol",
    "Ciprofloxacin",
    "Losartan",
    "Atorvastatin",
    "Gabapentin",
    "Prednisone",
    "Hydrochlorothiazide",
    "Zoloft",
    "Sertraline",
    "Xanax",
];

pub fn is_known_medication(name: &str) -> bool {
    MEDICATION_OPTIONS.contains(&name)
}
