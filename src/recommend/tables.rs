//! Builtin project-type profiles. Declaration order is classification
//! order; earlier profiles win when keywords overlap.

use crate::recommend::{ProjectProfile, ProjectRecommendations, RecommendationEntry};

fn entry(name: &str, reason: &str, priority: u32) -> RecommendationEntry {
    RecommendationEntry::new(name, reason, priority)
}

fn profile(
    keywords: &[&str],
    project_type: &str,
    context_message: &str,
    materials: Vec<RecommendationEntry>,
    crafts: Vec<RecommendationEntry>,
    techniques: Vec<RecommendationEntry>,
) -> ProjectProfile {
    ProjectProfile {
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
        recommendations: ProjectRecommendations {
            project_type: project_type.to_string(),
            context_message: context_message.to_string(),
            materials,
            crafts,
            techniques,
        },
    }
}

pub fn builtin_profiles() -> Vec<ProjectProfile> {
    vec![
        profile(
            &[
                "bedsheet",
                "bed sheet",
                "bedding",
                "bed linen",
                "duvet",
                "quilt",
            ],
            "Bedsheet",
            "Bedding works best with breathable natural fibres and skin-safe colours.",
            vec![
                entry("cotton", "Breathable, soft for sleep", 1),
                entry("linen", "Cool, crisp and durable", 2),
                entry("bamboo fabric", "Naturally antibacterial", 3),
            ],
            vec![
                entry("block printing", "Classic repeating patterns for large panels", 1),
                entry("handloom weaving", "Soft, dense weave suited to bedding", 2),
                entry("shibori", "Organic resist-dye texture", 3),
            ],
            vec![
                entry("natural dyeing", "Skin-safe colours for daily contact", 1),
                entry("screen printing", "Crisp motifs at bedsheet scale", 2),
                entry("hand stitching", "Durable finished edges", 3),
            ],
        ),
        profile(
            &["saree", "sari", "drape", "pallu"],
            "Saree",
            "Sarees call for fine drape, rich borders and heritage weaves.",
            vec![
                entry("silk", "Lustrous drape for occasion wear", 1),
                entry("cotton", "Everyday comfort and easy care", 2),
                entry("zari thread", "Metallic borders and motifs", 3),
            ],
            vec![
                entry("banarasi weaving", "Opulent brocade tradition", 1),
                entry("ikat", "Resist-dyed yarn patterning", 2),
                entry("kalamkari", "Hand-painted narrative panels", 3),
            ],
            vec![
                entry("zardozi", "Raised metallic embroidery", 1),
                entry("bandhani", "Fine tie-dye dotting", 2),
                entry("natural dyeing", "Deep, fast traditional colours", 3),
            ],
        ),
        profile(
            &["kurta", "tunic", "shirt", "apparel", "garment"],
            "Kurta",
            "Garments need fabric that breathes, washes well and holds embroidery.",
            vec![
                entry("cotton", "Breathable for daily wear", 1),
                entry("khadi", "Handspun texture with character", 2),
                entry("linen", "Structured yet airy", 3),
            ],
            vec![
                entry("chikankari", "Delicate shadow-work embroidery", 1),
                entry("block printing", "All-over garment prints", 2),
                entry("handloom weaving", "Custom yardage for cut-and-sew", 3),
            ],
            vec![
                entry("hand embroidery", "Fine detailing on collars and plackets", 1),
                entry("natural dyeing", "Soft, wearable palettes", 2),
            ],
        ),
        profile(
            &["cushion", "pillow", "bolster"],
            "Cushion Cover",
            "Cushion covers reward sturdy cloth and bold surface work.",
            vec![
                entry("cotton canvas", "Holds shape under daily use", 1),
                entry("jute", "Rustic texture for accents", 2),
                entry("silk", "Sheen for formal settings", 3),
            ],
            vec![
                entry("block printing", "Bold repeats at cushion scale", 1),
                entry("kantha", "Running-stitch quilted surface", 2),
                entry("applique", "Layered figurative panels", 3),
            ],
            vec![
                entry("mirror work", "Glint and texture highlights", 1),
                entry("hand embroidery", "Raised tactile motifs", 2),
                entry("screen printing", "Sharp geometric fronts", 3),
            ],
        ),
        profile(
            &["table runner", "tablecloth", "placemat", "napkin", "table linen"],
            "Table Linen",
            "Table pieces should survive spills and frequent washing.",
            vec![
                entry("cotton", "Washable and absorbent", 1),
                entry("linen", "Elegant fall on long runners", 2),
                entry("jute", "Heavy drape, natural look", 3),
            ],
            vec![
                entry("handloom weaving", "Selvedge-finished widths", 1),
                entry("block printing", "Border-led table layouts", 2),
                entry("crochet", "Openwork edging", 3),
            ],
            vec![
                entry("natural dyeing", "Food-adjacent safe colours", 1),
                entry("hand stitching", "Mitred, durable corners", 2),
            ],
        ),
        profile(
            &["wall hanging", "tapestry", "wall art", "mural", "wall decor"],
            "Wall Hanging",
            "Wall pieces can go bold: weight matters less than presence.",
            vec![
                entry("wool", "Rich texture for woven art", 1),
                entry("cotton", "Takes paint and print evenly", 2),
                entry("recycled fabric", "Layered, sustainable collage", 3),
            ],
            vec![
                entry("macrame", "Dimensional knotted structure", 1),
                entry("kalamkari", "Narrative painted scenes", 2),
                entry("tapestry weaving", "Pictorial woven panels", 3),
            ],
            vec![
                entry("hand painting", "Free-form artwork", 1),
                entry("applique", "High-contrast layered shapes", 2),
                entry("natural dyeing", "Muted gallery palettes", 3),
            ],
        ),
        profile(
            &["jewellery", "jewelry", "necklace", "earring", "bangle", "pendant"],
            "Jewellery",
            "Jewellery pairs precious and found materials with fine metalwork.",
            vec![
                entry("silver", "Workable, enduring base metal", 1),
                entry("brass", "Warm tone at accessible cost", 2),
                entry("glass beads", "Colour accents and volume", 3),
                entry("terracotta", "Lightweight earthen forms", 4),
            ],
            vec![
                entry("dhokra", "Lost-wax cast figurines", 1),
                entry("filigree", "Fine twisted-wire lace", 2),
                entry("beadwork", "Strung and woven colour", 3),
            ],
            vec![
                entry("metal casting", "Repeatable sculptural forms", 1),
                entry("stone setting", "Secure gem mounts", 2),
                entry("enamelling", "Vitreous colour on metal", 3),
            ],
        ),
        profile(
            &["dinnerware", "tableware", "plate", "bowl", "mug", "crockery", "pottery"],
            "Dinnerware",
            "Tableware must be food-safe, washable and pleasant in the hand.",
            vec![
                entry("stoneware clay", "Chip-resistant daily service", 1),
                entry("terracotta", "Traditional earthen warmth", 2),
                entry("ceramic", "Smooth glazed finish", 3),
            ],
            vec![
                entry("blue pottery", "Signature cobalt glazework", 1),
                entry("terracotta pottery", "Low-fired classic forms", 2),
                entry("wheel throwing", "Round, even vessels", 3),
            ],
            vec![
                entry("glazing", "Food-safe sealed surfaces", 1),
                entry("hand painting", "Underglaze decoration", 2),
                entry("carving", "Relief texture on rims", 3),
            ],
        ),
        profile(
            &["bag", "tote", "clutch", "pouch", "backpack"],
            "Bag",
            "Bags need structure, strong seams and hardware that lasts.",
            vec![
                entry("leather", "Ages well under load", 1),
                entry("cotton canvas", "Light, printable body", 2),
                entry("jute", "Inexpensive, biodegradable carry", 3),
            ],
            vec![
                entry("leather tooling", "Embossed structural panels", 1),
                entry("block printing", "Branded canvas surfaces", 2),
                entry("macrame", "Open-weave market bags", 3),
            ],
            vec![
                entry("hand stitching", "Saddle-stitched stress seams", 1),
                entry("rivet setting", "Reinforced strap anchors", 2),
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::builtin_profiles;

    #[test]
    fn keywords_are_lowercase_and_nonempty() {
        for profile in builtin_profiles() {
            assert!(!profile.keywords.is_empty());
            for keyword in &profile.keywords {
                assert_eq!(keyword, &keyword.to_lowercase());
                assert!(!keyword.trim().is_empty());
            }
        }
    }

    #[test]
    fn priorities_are_distinct_within_each_list() {
        for profile in builtin_profiles() {
            let bundle = &profile.recommendations;
            for list in [&bundle.materials, &bundle.crafts, &bundle.techniques] {
                let distinct: BTreeSet<u32> = list.iter().map(|e| e.priority).collect();
                assert_eq!(
                    distinct.len(),
                    list.len(),
                    "duplicate priority in {}",
                    bundle.project_type
                );
            }
        }
    }

    #[test]
    fn every_profile_recommends_all_three_domains() {
        for profile in builtin_profiles() {
            let bundle = &profile.recommendations;
            assert!(!bundle.materials.is_empty(), "{}", bundle.project_type);
            assert!(!bundle.crafts.is_empty(), "{}", bundle.project_type);
            assert!(!bundle.techniques.is_empty(), "{}", bundle.project_type);
        }
    }
}
