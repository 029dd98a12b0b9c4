use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

use crate::corrections::fold_label;
use crate::habits::HabitField;

/// Habit categories a study can filter on. The string form is the key used by
/// the studies store.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    AsRefStr,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
#[serde(try_from = "String", into = "&'static str")]
pub enum HabitFacet {
    #[strum(serialize = "habitudesAchat")]
    PurchaseHabits,
    #[strum(serialize = "epilation")]
    Epilation,
    #[strum(serialize = "soinsVisage")]
    FaceCare,
    #[strum(serialize = "nettoyage")]
    Cleansing,
    #[strum(serialize = "soinsCorps")]
    BodyCare,
    #[strum(serialize = "soinsSpecifiques")]
    SpecificCare,
    #[strum(serialize = "hygiene")]
    Hygiene,
    #[strum(serialize = "soinsCapillaires")]
    HairCare,
    #[strum(serialize = "maquillageVisage")]
    FaceMakeup,
    #[strum(serialize = "maquillageYeux")]
    EyeMakeup,
    #[strum(serialize = "maquillageLevresOngles")]
    LipNailMakeup,
    #[strum(serialize = "maquillagePermanent")]
    PermanentMakeup,
    #[strum(serialize = "solaires")]
    SunCare,
    #[strum(serialize = "parfums")]
    Perfumes,
}

impl TryFrom<String> for HabitFacet {
    type Error = strum::ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.trim().parse()
    }
}

const PURCHASE_HABITS: &[(&str, HabitField)] = &[
    ("Pharmacie / Parapharmacie", HabitField::AchatPharmacieParapharmacie),
    ("Grandes surfaces", HabitField::AchatGrandesSurfaces),
    ("Institut / Parfumerie", HabitField::AchatInstitutParfumerie),
    ("Internet", HabitField::AchatInternet),
    ("Vente directe", HabitField::AchatVenteDirecte),
    ("Magasins bio", HabitField::AchatMagasinsBio),
];

const EPILATION: &[(&str, HabitField)] = &[
    ("Rasoir", HabitField::Rasoir),
    ("Épilateur électrique", HabitField::EpilateurElectrique),
    ("Cire", HabitField::Cire),
    ("Crème dépilatoire", HabitField::CremeDepilatoire),
    ("Épilation en institut", HabitField::Institut),
    ("Épilation définitive / laser", HabitField::EpilationDefinitive),
    ("Lumière pulsée", HabitField::LumierePulsee),
];

const FACE_CARE: &[(&str, HabitField)] = &[
    ("Soin hydratant", HabitField::SoinHydratantVisage),
    ("Soin nourrissant", HabitField::SoinNourrissantVisage),
    ("Soin matifiant", HabitField::SoinMatifiantVisage),
    ("Soin anti-âge", HabitField::SoinAntiAgeVisage),
    ("Soin anti-rides", HabitField::SoinAntiRidesVisage),
    ("Soin anti-taches", HabitField::SoinAntiTachesVisage),
    ("Soin anti-rougeurs", HabitField::SoinAntiRougeursVisage),
    ("Soin éclat du teint", HabitField::SoinEclatDuTeint),
    ("Soin contour des yeux", HabitField::SoinContourDesYeux),
    ("Soin contour des lèvres", HabitField::SoinContourDesLevres),
    ("Sérum", HabitField::SerumVisage),
    ("Crème de nuit", HabitField::CremeDeNuit),
];

const CLEANSING: &[(&str, HabitField)] = &[
    ("Démaquillant visage", HabitField::DemaquillantVisage),
    ("Démaquillant yeux", HabitField::DemaquillantYeux),
    ("Démaquillant waterproof", HabitField::DemaquillantWaterproof),
    ("Gel nettoyant", HabitField::GelNettoyant),
    ("Eau micellaire", HabitField::EauMicellaire),
    ("Lotion tonique", HabitField::LotionTonique),
    ("Gommage visage", HabitField::GommageVisage),
    ("Masque visage", HabitField::MasqueVisage),
    ("Lingettes démaquillantes", HabitField::LingettesDemaquillantes),
];

const BODY_CARE: &[(&str, HabitField)] = &[
    ("Soin hydratant corps", HabitField::SoinHydratantCorps),
    ("Soin nourrissant corps", HabitField::SoinNourrissantCorps),
    ("Soin raffermissant", HabitField::SoinRaffermissantCorps),
    ("Soin amincissant", HabitField::SoinAmincissant),
    ("Soin anti-cellulite", HabitField::SoinAntiCellulite),
    ("Soin anti-vergetures", HabitField::SoinAntiVergetures),
    ("Soin anti-âge corps", HabitField::SoinAntiAgeCorps),
    ("Gommage corps", HabitField::GommageCorps),
    ("Huile corps", HabitField::HuileCorps),
];

const SPECIFIC_CARE: &[(&str, HabitField)] = &[
    ("Soin hydratant mains", HabitField::SoinHydratantMains),
    ("Soin nourrissant mains", HabitField::SoinNourrissantMains),
    ("Soin anti-âge mains", HabitField::SoinAntiAgeMains),
    ("Soin anti-taches mains", HabitField::SoinAntiTachesMains),
    ("Soin pieds", HabitField::SoinPieds),
    ("Soin ongles", HabitField::SoinOngles),
    ("Soin buste", HabitField::SoinBuste),
    ("Soin cou et décolleté", HabitField::SoinCouDecollete),
];

const HYGIENE: &[(&str, HabitField)] = &[
    ("Gel douche", HabitField::GelDouche),
    ("Lait douche", HabitField::LaitDouche),
    ("Savon", HabitField::Savon),
    ("Produits pour le bain", HabitField::ProduitsBain),
    ("Nettoyant intime", HabitField::NettoyantIntime),
    ("Déodorant", HabitField::Deodorant),
    ("Anti-transpirant", HabitField::AntiTranspirant),
    ("Dentifrice", HabitField::Dentifrice),
    ("Bain de bouche", HabitField::BainDeBouche),
];

const HAIR_CARE: &[(&str, HabitField)] = &[
    ("Shampooing", HabitField::Shampooing),
    ("Après-shampooing", HabitField::ApresShampooing),
    ("Masque capillaire", HabitField::MasqueCapillaire),
    ("Soin sans rinçage", HabitField::SoinSansRincage),
    ("Produit coiffant", HabitField::ProduitCoiffant),
    ("Coloration", HabitField::Coloration),
    ("Mèches", HabitField::Meches),
    ("Permanente", HabitField::Permanente),
    ("Lissage / Défrisage", HabitField::LissageDefrisage),
    ("Extensions capillaires", HabitField::ExtensionsCapillaires),
];

const FACE_MAKEUP: &[(&str, HabitField)] = &[
    ("Fond de teint", HabitField::FondDeTeint),
    ("Poudre libre", HabitField::PoudreLibre),
    ("Poudre compacte", HabitField::PoudreCompacte),
    ("Blush", HabitField::Blush),
    ("Correcteur de teint", HabitField::CorrecteurTeint),
    ("Anti-cernes", HabitField::AntiCernes),
    ("Base de maquillage", HabitField::BaseMaquillage),
    ("Crème teintée", HabitField::CremeTeintee),
    ("Enlumineur", HabitField::Enlumineur),
    ("Poudre bronzante", HabitField::PoudreBronzante),
];

const EYE_MAKEUP: &[(&str, HabitField)] = &[
    ("Mascara", HabitField::Mascara),
    ("Mascara waterproof", HabitField::MascaraWaterproof),
    ("Crayon yeux", HabitField::CrayonYeux),
    ("Eyeliner", HabitField::Eyeliner),
    ("Fard à paupières", HabitField::FardAPaupieres),
    ("Maquillage des sourcils", HabitField::MaquillageSourcils),
    ("Faux cils", HabitField::FauxCils),
    ("Base paupières", HabitField::BasePaupieres),
];

const LIP_NAIL_MAKEUP: &[(&str, HabitField)] = &[
    ("Rouge à lèvres", HabitField::RougeALevres),
    ("Gloss", HabitField::Gloss),
    ("Crayon lèvres", HabitField::CrayonLevres),
    ("Baume à lèvres", HabitField::BaumeALevres),
    ("Vernis à ongles", HabitField::VernisAOngles),
    ("Dissolvant", HabitField::Dissolvant),
    ("Faux ongles", HabitField::FauxOngles),
    ("Vernis semi-permanent", HabitField::VernisSemiPermanent),
    ("Manucure", HabitField::Manucure),
];

const PERMANENT_MAKEUP: &[(&str, HabitField)] = &[
    ("Maquillage permanent des yeux", HabitField::MaquillagePermanentYeux),
    ("Maquillage permanent des lèvres", HabitField::MaquillagePermanentLevres),
    ("Maquillage permanent des sourcils", HabitField::MaquillagePermanentSourcils),
    ("Microblading", HabitField::Microblading),
];

const SUN_CARE: &[(&str, HabitField)] = &[
    ("Protecteur solaire visage", HabitField::ProtecteurSolaireVisage),
    ("Protecteur solaire corps", HabitField::ProtecteurSolaireCorps),
    ("Protecteur solaire lèvres", HabitField::ProtecteurSolaireLevres),
    ("Soin après-soleil", HabitField::SoinApresSoleil),
    ("Autobronzant visage", HabitField::AutobronzantVisage),
    ("Autobronzant corps", HabitField::AutobronzantCorps),
];

const PERFUMES: &[(&str, HabitField)] = &[
    ("Parfum", HabitField::Parfum),
    ("Eau de toilette", HabitField::EauDeToilette),
    ("Eau de parfum", HabitField::EauDeParfum),
    ("Eau fraîche / Brume parfumée", HabitField::BrumeParfumee),
];

/// Folded label → field, per facet. Used when a stored study carries a label
/// with different casing or accents than the table.
static FOLDED_LABELS: Lazy<HashMap<(HabitFacet, String), HabitField>> = Lazy::new(|| {
    let mut m = HashMap::new();
    for facet in HabitFacet::iter() {
        for (label, field) in facet.options() {
            m.insert((facet, fold_label(label)), *field);
        }
    }
    m
});

impl HabitFacet {
    /// Wire name of the facet (`"soinsVisage"`, ...).
    pub fn key(self) -> &'static str {
        self.into()
    }

    /// Option labels offered by the study form, with the habits field each
    /// one reads.
    pub fn options(self) -> &'static [(&'static str, HabitField)] {
        match self {
            HabitFacet::PurchaseHabits => PURCHASE_HABITS,
            HabitFacet::Epilation => EPILATION,
            HabitFacet::FaceCare => FACE_CARE,
            HabitFacet::Cleansing => CLEANSING,
            HabitFacet::BodyCare => BODY_CARE,
            HabitFacet::SpecificCare => SPECIFIC_CARE,
            HabitFacet::Hygiene => HYGIENE,
            HabitFacet::HairCare => HAIR_CARE,
            HabitFacet::FaceMakeup => FACE_MAKEUP,
            HabitFacet::EyeMakeup => EYE_MAKEUP,
            HabitFacet::LipNailMakeup => LIP_NAIL_MAKEUP,
            HabitFacet::PermanentMakeup => PERMANENT_MAKEUP,
            HabitFacet::SunCare => SUN_CARE,
            HabitFacet::Perfumes => PERFUMES,
        }
    }

    pub fn field_for(self, label: &str) -> Option<HabitField> {
        let trimmed = label.trim();
        self.options()
            .iter()
            .find(|(candidate, _)| *candidate == trimmed)
            .map(|(_, field)| *field)
            .or_else(|| FOLDED_LABELS.get(&(self, fold_label(trimmed))).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_habit_field_belongs_to_exactly_one_facet() {
        let mut seen = HashSet::new();
        for facet in HabitFacet::iter() {
            for (label, field) in facet.options() {
                assert!(seen.insert(*field), "{field:?} mapped twice ({label})");
            }
        }
        assert_eq!(seen.len(), HabitField::iter().count());
    }

    #[test]
    fn labels_are_unique_within_a_facet() {
        for facet in HabitFacet::iter() {
            let folded: HashSet<_> = facet.options().iter().map(|(l, _)| fold_label(l)).collect();
            assert_eq!(folded.len(), facet.options().len(), "{facet:?}");
        }
    }

    #[test]
    fn looks_up_face_care_labels() {
        assert_eq!(
            HabitFacet::FaceCare.field_for("Soin hydratant"),
            Some(HabitField::SoinHydratantVisage)
        );
        assert_eq!(
            HabitFacet::FaceCare.field_for("soin anti-age"),
            Some(HabitField::SoinAntiAgeVisage)
        );
        assert_eq!(HabitFacet::FaceCare.field_for("Mascara"), None);
    }

    #[test]
    fn facet_keys_round_trip_through_serde() {
        assert_eq!(HabitFacet::FaceCare.key(), "soinsVisage");
        let json = serde_json::to_string(&HabitFacet::LipNailMakeup).unwrap();
        assert_eq!(json, "\"maquillageLevresOngles\"");
        let parsed: HabitFacet = serde_json::from_str("\"solaires\"").unwrap();
        assert_eq!(parsed, HabitFacet::SunCare);
        assert!(serde_json::from_str::<HabitFacet>("\"inconnu\"").is_err());
    }
}
