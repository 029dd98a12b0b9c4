use strum::{AsRefStr, EnumIter, EnumString, IntoStaticStr};

/// Every answer column of the cosmetic-habits questionnaire.
///
/// The string form of each variant is the field name used by the habits API,
/// so the enum doubles as the schema contract for [`super::HabitsRecord`].
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    AsRefStr,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
#[strum(serialize_all = "camelCase", ascii_case_insensitive)]
pub enum HabitField {
    // Purchase habits
    AchatPharmacieParapharmacie,
    AchatGrandesSurfaces,
    AchatInstitutParfumerie,
    AchatInternet,
    AchatVenteDirecte,
    AchatMagasinsBio,
    // Epilation
    Rasoir,
    EpilateurElectrique,
    Cire,
    CremeDepilatoire,
    Institut,
    EpilationDefinitive,
    LumierePulsee,
    // Face care
    SoinHydratantVisage,
    SoinNourrissantVisage,
    SoinMatifiantVisage,
    SoinAntiAgeVisage,
    SoinAntiRidesVisage,
    SoinAntiTachesVisage,
    SoinAntiRougeursVisage,
    SoinEclatDuTeint,
    SoinContourDesYeux,
    SoinContourDesLevres,
    SerumVisage,
    CremeDeNuit,
    // Cleansing
    DemaquillantVisage,
    DemaquillantYeux,
    DemaquillantWaterproof,
    GelNettoyant,
    EauMicellaire,
    LotionTonique,
    GommageVisage,
    MasqueVisage,
    LingettesDemaquillantes,
    // Body care
    SoinHydratantCorps,
    SoinNourrissantCorps,
    SoinRaffermissantCorps,
    SoinAmincissant,
    SoinAntiCellulite,
    SoinAntiVergetures,
    SoinAntiAgeCorps,
    GommageCorps,
    HuileCorps,
    // Specific care
    SoinHydratantMains,
    SoinNourrissantMains,
    SoinAntiAgeMains,
    SoinAntiTachesMains,
    SoinPieds,
    SoinOngles,
    SoinBuste,
    SoinCouDecollete,
    // Hygiene
    GelDouche,
    LaitDouche,
    Savon,
    ProduitsBain,
    NettoyantIntime,
    Deodorant,
    AntiTranspirant,
    Dentifrice,
    BainDeBouche,
    // Hair care
    Shampooing,
    ApresShampooing,
    MasqueCapillaire,
    SoinSansRincage,
    ProduitCoiffant,
    Coloration,
    Meches,
    Permanente,
    LissageDefrisage,
    ExtensionsCapillaires,
    // Face makeup
    FondDeTeint,
    PoudreLibre,
    PoudreCompacte,
    Blush,
    CorrecteurTeint,
    AntiCernes,
    BaseMaquillage,
    CremeTeintee,
    Enlumineur,
    PoudreBronzante,
    // Eye makeup
    Mascara,
    MascaraWaterproof,
    CrayonYeux,
    Eyeliner,
    #[strum(serialize = "fardAPaupieres")]
    FardAPaupieres,
    MaquillageSourcils,
    FauxCils,
    BasePaupieres,
    // Lips and nails
    #[strum(serialize = "rougeALevres")]
    RougeALevres,
    Gloss,
    CrayonLevres,
    #[strum(serialize = "baumeALevres")]
    BaumeALevres,
    #[strum(serialize = "vernisAOngles")]
    VernisAOngles,
    Dissolvant,
    FauxOngles,
    VernisSemiPermanent,
    Manucure,
    // Permanent makeup
    MaquillagePermanentYeux,
    MaquillagePermanentLevres,
    MaquillagePermanentSourcils,
    Microblading,
    // Sun care
    ProtecteurSolaireVisage,
    ProtecteurSolaireCorps,
    ProtecteurSolaireLevres,
    SoinApresSoleil,
    AutobronzantVisage,
    AutobronzantCorps,
    // Perfumes
    Parfum,
    EauDeToilette,
    EauDeParfum,
    BrumeParfumee,
}

impl HabitField {
    /// Field name as it appears in the habits payload.
    pub fn field_name(self) -> &'static str {
        self.into()
    }

    pub fn from_field_name(name: &str) -> Option<Self> {
        name.trim().parse().ok()
    }
}
