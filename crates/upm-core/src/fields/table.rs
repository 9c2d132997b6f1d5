use super::{FieldDescriptor, FieldType};

const NAMES: &str = "Names & Taxonomy";
const SEQUENCES: &str = "Sequences";
const FUNCTION: &str = "Function";
const MISC: &str = "Miscellaneous";
const INTERACTION: &str = "Interaction";
const EXPRESSION: &str = "Expression";
const GO: &str = "Gene Ontology (GO)";
const PATHOLOGY: &str = "Pathology & Biotech";
const LOCATION: &str = "Subcellular location";
const PTM: &str = "PTM / Processing";
const STRUCTURE: &str = "Structure";
const PUBLICATIONS: &str = "Publications";
const DATES: &str = "Date of";
const FAMILY: &str = "Family & Domains";
const XREFS: &str = "Cross-references";

/// Return column with a text value
const fn col(name: &'static str, label: &'static str, category: &'static str) -> FieldDescriptor {
    FieldDescriptor {
        name,
        label,
        category,
        field_type: FieldType::Text,
        is_default_return: false,
        queryable: false,
        returnable: true,
    }
}

/// Return column that is part of the default set
const fn default_col(
    name: &'static str,
    label: &'static str,
    category: &'static str,
) -> FieldDescriptor {
    FieldDescriptor {
        is_default_return: true,
        ..col(name, label, category)
    }
}

/// Field usable both in queries and as a return column
const fn both(
    name: &'static str,
    label: &'static str,
    category: &'static str,
    field_type: FieldType,
) -> FieldDescriptor {
    FieldDescriptor {
        field_type,
        queryable: true,
        ..col(name, label, category)
    }
}

/// Query-only field
const fn query(name: &'static str, category: &'static str, field_type: FieldType) -> FieldDescriptor {
    FieldDescriptor {
        name,
        label: name,
        category,
        field_type,
        is_default_return: false,
        queryable: true,
        returnable: false,
    }
}

/// Cross-reference column; also accepted in `xref` / `xrefcount` queries
const fn xref(name: &'static str, label: &'static str) -> FieldDescriptor {
    FieldDescriptor {
        field_type: FieldType::CrossReference,
        queryable: true,
        ..col(name, label, XREFS)
    }
}

pub static FIELDS: &[FieldDescriptor] = &[
    // Names & Taxonomy
    FieldDescriptor {
        queryable: true,
        ..default_col("accession", "Entry", NAMES)
    },
    default_col("id", "Entry Name", NAMES),
    default_col("gene_names", "Gene Names", NAMES),
    col("gene_primary", "Gene Names (primary)", NAMES),
    col("gene_synonym", "Gene Names (synonym)", NAMES),
    col("gene_oln", "Gene Names (ordered locus)", NAMES),
    col("gene_orf", "Gene Names (ORF)", NAMES),
    FieldDescriptor {
        queryable: true,
        ..default_col("organism_name", "Organism", NAMES)
    },
    FieldDescriptor {
        queryable: true,
        ..default_col("organism_id", "Organism (ID)", NAMES)
    },
    FieldDescriptor {
        queryable: true,
        ..default_col("protein_name", "Protein names", NAMES)
    },
    col("xref_proteomes", "Proteomes", NAMES),
    col("lineage", "Taxonomic lineage", NAMES),
    col("lineage_ids", "Taxonomic lineage (Ids)", NAMES),
    col("virus_hosts", "Virus hosts", NAMES),
    query("gene", NAMES, FieldType::Text),
    query("gene_exact", NAMES, FieldType::Text),
    query("accession_id", NAMES, FieldType::Text),
    query("sec_acc", NAMES, FieldType::Text),
    query("taxonomy_name", NAMES, FieldType::Text),
    query("taxonomy_id", NAMES, FieldType::Text),
    query("virus_host_name", NAMES, FieldType::Text),
    query("virus_host_id", NAMES, FieldType::Text),
    query("proteome", NAMES, FieldType::Text),
    query("proteomecomponent", NAMES, FieldType::Text),
    query("plasmid", NAMES, FieldType::Text),
    // Sequences
    col("cc_alternative_products", "Alternative products", SEQUENCES),
    col("ft_var_seq", "Alternative sequence", SEQUENCES),
    col("error_gmodel_pred", "Erroneous gene model prediction", SEQUENCES),
    both("fragment", "Fragment", SEQUENCES, FieldType::Boolean),
    both("organelle", "Gene encoded by", SEQUENCES, FieldType::Text),
    both("length", "Length", SEQUENCES, FieldType::NumericRange),
    both("mass", "Mass", SEQUENCES, FieldType::NumericRange),
    both("cc_mass_spectrometry", "Mass spectrometry", SEQUENCES, FieldType::Text),
    col("ft_variant", "Natural variant", SEQUENCES),
    col("ft_non_cons", "Non-adjacent residues", SEQUENCES),
    col("ft_non_std", "Non-standard residue", SEQUENCES),
    col("ft_non_ter", "Non-terminal residue", SEQUENCES),
    col("cc_polymorphism", "Polymorphism", SEQUENCES),
    col("cc_rna_editing", "RNA Editing", SEQUENCES),
    default_col("sequence", "Sequence", SEQUENCES),
    col("cc_sequence_caution", "Sequence caution", SEQUENCES),
    col("ft_conflict", "Sequence conflict", SEQUENCES),
    col("ft_unsure", "Sequence uncertainty", SEQUENCES),
    col("sequence_version", "Sequence version", SEQUENCES),
    query("is_isoform", SEQUENCES, FieldType::Boolean),
    // Function
    col("absorption", "Absorption", FUNCTION),
    col("ft_act_site", "Active site", FUNCTION),
    col("ft_binding", "Binding site", FUNCTION),
    col("cc_catalytic_activity", "Catalytic activity", FUNCTION),
    col("cc_cofactor", "Cofactor", FUNCTION),
    col("ft_dna_bind", "DNA binding", FUNCTION),
    both("ec", "EC number", FUNCTION, FieldType::Text),
    col("cc_activity_regulation", "Activity regulation", FUNCTION),
    col("cc_function", "Function [CC]", FUNCTION),
    col("kinetics", "Kinetics", FUNCTION),
    col("cc_pathway", "Pathway", FUNCTION),
    col("ph_dependence", "pH dependence", FUNCTION),
    col("redox_potential", "Redox potential", FUNCTION),
    col("rhea", "Rhea ID", FUNCTION),
    col("ft_site", "Site", FUNCTION),
    col("temp_dependence", "Temperature dependence", FUNCTION),
    query("chebi", FUNCTION, FieldType::Text),
    query("inchikey", FUNCTION, FieldType::Text),
    // Miscellaneous
    col("annotation_score", "Annotation", MISC),
    col("cc_caution", "Caution", MISC),
    col("comment_count", "Comments", MISC),
    col("feature_count", "Features", MISC),
    col("keywordid", "Keyword ID", MISC),
    both("keyword", "Keywords", MISC, FieldType::Text),
    col("cc_miscellaneous", "Miscellaneous [CC]", MISC),
    col("protein_existence", "Protein existence", MISC),
    both("reviewed", "Reviewed", MISC, FieldType::Boolean),
    col("tools", "Tools", MISC),
    col("uniparc_id", "UniParc", MISC),
    query("active", MISC, FieldType::Boolean),
    query("existence", MISC, FieldType::Text),
    query("database", MISC, FieldType::Text),
    query("xref", MISC, FieldType::Text),
    query("cc_webresource", MISC, FieldType::Text),
    // Interaction
    col("cc_interaction", "Interacts with", INTERACTION),
    col("cc_subunit", "Subunit structure", INTERACTION),
    query("interactor", INTERACTION, FieldType::Text),
    // Expression
    col("cc_developmental_stage", "Developmental stage", EXPRESSION),
    col("cc_induction", "Induction", EXPRESSION),
    col("cc_tissue_specificity", "Tissue specificity", EXPRESSION),
    query("tissue", EXPRESSION, FieldType::Text),
    // Gene Ontology
    default_col("go_p", "Gene Ontology (biological process)", GO),
    default_col("go_c", "Gene Ontology (cellular component)", GO),
    both("go", "Gene Ontology (GO)", GO, FieldType::Text),
    default_col("go_f", "Gene Ontology (molecular function)", GO),
    default_col("go_id", "Gene Ontology IDs", GO),
    // Pathology & Biotech
    col("cc_allergen", "Allergenic properties", PATHOLOGY),
    col("cc_biotechnology", "Biotechnological use", PATHOLOGY),
    col("cc_disruption_phenotype", "Disruption phenotype", PATHOLOGY),
    col("cc_disease", "Involvement in disease", PATHOLOGY),
    col("ft_mutagen", "Mutagenesis", PATHOLOGY),
    col("cc_pharmaceutical", "Pharmaceutical use", PATHOLOGY),
    col("cc_toxic_dose", "Toxic dose", PATHOLOGY),
    // Subcellular location
    col("ft_intramem", "Intramembrane", LOCATION),
    default_col("cc_subcellular_location", "Subcellular location [CC]", LOCATION),
    col("ft_topo_dom", "Topological domain", LOCATION),
    col("ft_transmem", "Transmembrane", LOCATION),
    // PTM / Processing
    col("ft_chain", "Chain", PTM),
    col("ft_crosslnk", "Cross-link", PTM),
    col("ft_disulfid", "Disulfide bond", PTM),
    col("ft_carbohyd", "Glycosylation", PTM),
    col("ft_init_met", "Initiator methionine", PTM),
    col("ft_lipid", "Lipidation", PTM),
    col("ft_mod_res", "Modified residue", PTM),
    col("ft_peptide", "Peptide", PTM),
    col("cc_ptm", "Post-translational modification", PTM),
    col("ft_propep", "Propeptide", PTM),
    col("ft_signal", "Signal peptide", PTM),
    col("ft_transit", "Transit peptide", PTM),
    // Structure
    col("structure_3d", "3D", STRUCTURE),
    col("ft_strand", "Beta strand", STRUCTURE),
    col("ft_helix", "Helix", STRUCTURE),
    col("ft_turn", "Turn", STRUCTURE),
    // Publications
    col("lit_pubmed_id", "PubMed ID", PUBLICATIONS),
    col("lit_doi_id", "DOI ID", PUBLICATIONS),
    query("lit_author", PUBLICATIONS, FieldType::Text),
    query("scope", PUBLICATIONS, FieldType::Text),
    // Dates
    both("date_created", "Date of creation", DATES, FieldType::DateRange),
    both("date_modified", "Date of last modification", DATES, FieldType::DateRange),
    both(
        "date_sequence_modified",
        "Date of last sequence modification",
        DATES,
        FieldType::DateRange,
    ),
    col("version", "Entry version", DATES),
    // Family & Domains
    col("ft_coiled", "Coiled coil", FAMILY),
    col("ft_compbias", "Compositional bias", FAMILY),
    col("cc_domain", "Domain [CC]", FAMILY),
    col("ft_domain", "Domain [FT]", FAMILY),
    col("ft_motif", "Motif", FAMILY),
    col("protein_families", "Protein families", FAMILY),
    col("ft_region", "Region", FAMILY),
    col("ft_repeat", "Repeat", FAMILY),
    col("ft_zn_fing", "Zinc finger", FAMILY),
    query("family", FAMILY, FieldType::Text),
    // Cross-references
    xref("xref_alphafolddb", "AlphaFoldDB"),
    xref("xref_biogrid", "BioGRID"),
    xref("xref_ccds", "CCDS"),
    xref("xref_chembl", "ChEMBL"),
    xref("xref_drugbank", "DrugBank"),
    xref("xref_embl", "EMBL"),
    xref("xref_ensembl", "Ensembl"),
    xref("xref_geneid", "GeneID"),
    xref("xref_hgnc", "HGNC"),
    xref("xref_intact", "IntAct"),
    xref("xref_interpro", "InterPro"),
    xref("xref_kegg", "KEGG"),
    xref("xref_mim", "MIM"),
    xref("xref_orthodb", "OrthoDB"),
    xref("xref_panther", "PANTHER"),
    xref("xref_pdb", "PDB"),
    xref("xref_pfam", "Pfam"),
    xref("xref_prosite", "PROSITE"),
    xref("xref_reactome", "Reactome"),
    xref("xref_refseq", "RefSeq"),
    xref("xref_smart", "SMART"),
    xref("xref_smr", "SMR"),
    xref("xref_string", "STRING"),
];
