// CV analysis LLM prompt templates.
// All prompts for the cv module are defined here.

pub const CV_ANALYSIS_PROMPT: &str = r#"You are an experienced study-abroad consultant for Indonesian students.
Analyze the CV below and recommend study programs (jurusan), universities and scholarships
that fit the candidate's background AND budget.

Current date: {current_date}

BUDGET:
{budget_section}

CV:
{cv_source}

Return a JSON object with exactly this structure:
{
  "academic_analysis": "assessment of the academic background in 3-5 sentences",
  "skills_assessment": "assessment of technical and soft skills in 3-5 sentences",
  "recommended_programs": [
    {
      "university": "university name",
      "jurusan": "study program",
      "country": "country",
      "city": "city",
      "annual_cost_idr": 0,
      "scholarship_amount_idr": 0,
      "net_cost_idr": 0,
      "fits_budget": "yes/no",
      "match_score": 0,
      "reasoning": "why this program fits the candidate",
      "world_ranking": 0,
      "admission_requirements": "GPA, language tests and documents required"
    }
  ],
  "scholarship_priorities": [
    {
      "name": "scholarship name",
      "coverage_idr": 0,
      "coverage_percentage": 0,
      "deadline": "YYYY-MM-DD",
      "application_url": "official URL",
      "success_probability": "high/medium/low",
      "requirements": "key eligibility requirements",
      "documents_needed": "documents to prepare"
    }
  ],
  "preparation_steps": [
    {"action": "what to do", "deadline": "YYYY-MM-DD", "cost_idr": 0, "priority": "high/medium/low"}
  ],
  "improvement_areas": [
    {
      "area": "area to improve",
      "current_level": "where the candidate is now",
      "target_level": "where they need to be",
      "action_plan": "how to get there",
      "timeline": "how long it takes",
      "estimated_cost_idr": 0
    }
  ],
  "budget_breakdown": {
    "average_tuition_idr": 0,
    "average_living_monthly_idr": 0,
    "total_annual_cost_idr": 0,
    "best_scholarship_coverage_idr": 0,
    "minimum_self_funding_idr": 0
  },
  "climate_security": {
    "climate_type": "climate of the top recommendation",
    "temperature_range": "typical range in Celsius",
    "safety_score": 0,
    "clothing_budget_idr": 0,
    "adaptation_tips": "practical tips"
  },
  "religious_facilities": {
    "islam": {
      "availability": "high/medium/low",
      "mosque_distance": "distance from campus",
      "halal_food": "availability of halal food",
      "prayer_rooms": "prayer rooms on campus",
      "community": "Muslim student community"
    },
    "christian": {
      "availability": "high/medium/low",
      "church_distance": "distance from campus",
      "denominations": "denominations present"
    }
  }
}

Recommend 3 to 5 programs ordered by match_score (0-100). All numeric amounts are plain
numbers in IDR without separators.
"#;

/// Used when the CV text is inlined into the prompt.
pub const CV_TEXT_SOURCE: &str = "CV Content:\n{cv_text}";

/// Used when the CV travels as an attachment (image or unreadable PDF).
pub const CV_ATTACHMENT_SOURCE: &str =
    "The CV is attached to this message. Read it carefully, including any tables or scanned text.";

pub const CV_SCHOLARSHIP_TIMELINE_PROMPT: &str = r#"You are a scholarship planning assistant for Indonesian students.

Current date: {current_date}
Target countries: {countries}
Field of study: {field}

BUDGET:
{budget_section}

For each target country list the scholarships open to Indonesian students in this field and
build an application timeline starting from the current date. Return a JSON object with exactly
this structure:
{
  "scholarships": [
    {
      "country": "country",
      "scholarship_name": "exact scholarship name",
      "provider": "government/university/foundation/corporate",
      "coverage": "what is covered",
      "amount_idr": 0,
      "application_open": "YYYY-MM-DD",
      "application_deadline": "YYYY-MM-DD",
      "announcement_date": "Month YYYY",
      "eligibility": "key requirements",
      "fits_budget": "yes/no"
    }
  ],
  "timeline": [
    {
      "date": "YYYY-MM-DD",
      "milestone": "what needs to be done",
      "related_scholarships": ["scholarship names"],
      "priority": "critical/high/medium"
    }
  ],
  "recommendations": ["ordered advice on which scholarships to target first"]
}

Only include deadlines that have not passed yet; if a scholarship's deadline for this cycle
has passed, use the next cycle.
"#;
